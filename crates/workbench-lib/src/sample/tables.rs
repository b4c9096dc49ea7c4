//! Domain tables driving sample generation

/// Technical skills per degree; the first key contained in the degree wins
pub const TECHNICAL_SKILLS_BY_FIELD: &[(&str, &[&str])] = &[
    (
        "Computer Science",
        &[
            "Python",
            "Java",
            "JavaScript",
            "C++",
            "SQL",
            "React",
            "Node.js",
            "AWS",
            "Docker",
            "Kubernetes",
            "Machine Learning",
            "Data Analysis",
            "Git",
            "CI/CD",
            "REST APIs",
        ],
    ),
    (
        "Business Administration",
        &[
            "Excel",
            "PowerPoint",
            "Financial Analysis",
            "Market Research",
            "CRM Software",
            "SQL",
            "Tableau",
            "Power BI",
            "QuickBooks",
            "SAP",
            "Salesforce",
        ],
    ),
    (
        "Mechanical Engineering",
        &[
            "AutoCAD",
            "SolidWorks",
            "MATLAB",
            "Finite Element Analysis",
            "CFD",
            "GD&T",
            "Thermodynamics",
            "Fluid Mechanics",
            "3D Printing",
            "CNC Programming",
        ],
    ),
    (
        "Electrical Engineering",
        &[
            "Circuit Design",
            "PCB Layout",
            "FPGA",
            "Microcontrollers",
            "Signal Processing",
            "MATLAB",
            "Verilog",
            "SPICE",
            "Embedded Systems",
            "Power Systems",
        ],
    ),
    (
        "Marketing",
        &[
            "Google Analytics",
            "SEO",
            "Social Media Marketing",
            "Content Creation",
            "Adobe Creative Suite",
            "Email Marketing",
            "CRM Software",
            "Market Research",
            "Copywriting",
        ],
    ),
    (
        "Finance",
        &[
            "Financial Modeling",
            "Excel",
            "Bloomberg Terminal",
            "Financial Analysis",
            "Accounting",
            "Risk Assessment",
            "Valuation",
            "VBA",
            "SQL",
            "Python",
        ],
    ),
];

/// Technical skills for degrees without their own table
pub const GENERIC_TECHNICAL_SKILLS: &[&str] = &[
    "Microsoft Office",
    "Project Management",
    "Data Analysis",
    "Research Methods",
    "Technical Writing",
    "Presentation Skills",
    "Problem Solving",
];

pub const SOFT_SKILLS: &[&str] = &[
    "Communication",
    "Leadership",
    "Teamwork",
    "Problem Solving",
    "Critical Thinking",
    "Time Management",
    "Adaptability",
    "Creativity",
    "Emotional Intelligence",
    "Conflict Resolution",
    "Decision Making",
    "Negotiation",
    "Presentation Skills",
    "Active Listening",
    "Networking",
    "Work Ethic",
    "Attention to Detail",
    "Cultural Awareness",
    "Customer Service",
    "Interpersonal Skills",
];

pub const TECHNOLOGY_SPECIALIZATIONS: &[&str] = &[
    "Software Engineering",
    "Data Science",
    "Artificial Intelligence",
    "Cybersecurity",
    "Web Development",
    "Mobile Development",
    "Cloud Computing",
];

pub const ENGINEERING_SPECIALIZATIONS: &[&str] = &[
    "Structural Engineering",
    "Environmental Engineering",
    "Biomedical Engineering",
];

pub const BUSINESS_SPECIALIZATIONS: &[&str] = &[
    "Investment Banking",
    "Corporate Finance",
    "Financial Analysis",
    "Marketing Analytics",
    "Digital Marketing",
    "Brand Management",
    "Human Resources",
    "Operations Management",
    "Supply Chain Management",
];

const BUSINESS_DEGREES: &[&str] = &["Business Administration", "Finance", "Marketing", "Accounting"];

/// Specializations that fit a degree; `["None"]` when nothing maps
pub fn specializations_for(degree: Option<&str>) -> &'static [&'static str] {
    match degree {
        Some("Computer Science") => TECHNOLOGY_SPECIALIZATIONS,
        Some(d) if d.contains("Engineering") => ENGINEERING_SPECIALIZATIONS,
        Some(d) if BUSINESS_DEGREES.contains(&d) => BUSINESS_SPECIALIZATIONS,
        _ => &["None"],
    }
}

pub fn technical_skills_for(degree: Option<&str>) -> &'static [&'static str] {
    degree
        .and_then(|d| {
            TECHNICAL_SKILLS_BY_FIELD
                .iter()
                .find(|(key, _)| d.contains(key))
                .map(|(_, skills)| *skills)
        })
        .unwrap_or(GENERIC_TECHNICAL_SKILLS)
}

/// Narrower ranges that make numeric samples look like real students
pub fn plausible_range(field: &str) -> Option<(f64, f64)> {
    match field {
        "gpa" => Some((2.5, 4.0)),
        "internships" => Some((0.0, 3.0)),
        "research_experience" => Some((0.0, 24.0)),
        _ => None,
    }
}

/// Options left out of a draw when alternatives remain
pub fn implausible_options(field: &str) -> &'static [&'static str] {
    match field {
        "degree" | "degree_program" => &["Other"],
        "certifications" => &["More than 5"],
        _ => &[],
    }
}

//! Input schemas and built-in model descriptors

use crate::models::{InputField, Model, TextTag};

pub const CAREER_PATH_NAME: &str = "Career Path Prediction";
pub const EMPLOYMENT_PROBABILITY_NAME: &str = "Employment Probability Post-Graduation";

const DEGREE_PROGRAMS: &[&str] = &[
    "Computer Science",
    "Business Administration",
    "Mechanical Engineering",
    "Electrical Engineering",
    "Civil Engineering",
    "Marketing",
    "Finance",
    "Accounting",
    "Psychology",
    "Biology",
    "Chemistry",
    "Physics",
    "Mathematics",
    "English",
    "History",
    "Political Science",
    "Sociology",
    "Communications",
    "Graphic Design",
    "Other",
];

const SPECIALIZATIONS: &[&str] = &[
    "None",
    "Software Engineering",
    "Data Science",
    "Artificial Intelligence",
    "Cybersecurity",
    "Web Development",
    "Mobile Development",
    "Cloud Computing",
    "Investment Banking",
    "Corporate Finance",
    "Financial Analysis",
    "Marketing Analytics",
    "Digital Marketing",
    "Brand Management",
    "Human Resources",
    "Operations Management",
    "Supply Chain Management",
    "Structural Engineering",
    "Environmental Engineering",
    "Biomedical Engineering",
    "Other",
];

const CERTIFICATIONS: &[&str] = &["None", "1-2", "3-5", "More than 5"];

const INDUSTRIES: &[&str] = &[
    "Technology",
    "Finance",
    "Healthcare",
    "Education",
    "Manufacturing",
    "Retail",
    "Government",
    "Non-profit",
    "Entertainment",
    "Energy",
    "Consulting",
    "No Preference",
];

fn career_path_inputs() -> Vec<InputField> {
    vec![
        InputField::select("degree_program", "Degree Program", DEGREE_PROGRAMS),
        InputField::select("specialization", "Specialization/Concentration", SPECIALIZATIONS),
        InputField::number("gpa", "GPA", 0.0, 4.0, Some(0.1)),
        InputField::text(
            "technical_skills",
            "Technical Skills (comma separated)",
            Some("e.g., Python, SQL, Java, Excel, CAD, MATLAB"),
            TextTag::TechnicalSkills,
        ),
        InputField::text(
            "soft_skills",
            "Soft Skills (comma separated)",
            Some("e.g., Leadership, Communication, Teamwork, Problem-solving"),
            TextTag::SoftSkills,
        ),
        InputField::number("internships", "Number of Internships", 0.0, 10.0, None),
        InputField::number(
            "research_experience",
            "Research Experience (months)",
            0.0,
            60.0,
            None,
        ),
        InputField::select("certifications", "Professional Certifications", CERTIFICATIONS),
        InputField::select("industry_preference", "Industry Preference", INDUSTRIES),
    ]
}

fn employment_probability_inputs() -> Vec<InputField> {
    vec![
        InputField::select("degree_program", "Degree Program", DEGREE_PROGRAMS),
        InputField::number("gpa", "GPA", 0.0, 4.0, Some(0.1)),
        InputField::number("internships", "Number of Internships", 0.0, 10.0, None),
        InputField::number(
            "industry_relevant_projects",
            "Industry-Relevant Projects",
            0.0,
            20.0,
            None,
        ),
        InputField::number("leadership_roles", "Leadership Roles", 0.0, 10.0, None),
        InputField::number(
            "technical_skills_count",
            "Number of Technical Skills",
            0.0,
            20.0,
            None,
        ),
        InputField::select("certifications", "Professional Certifications", CERTIFICATIONS),
        InputField::number(
            "networking_events",
            "Networking Events Attended",
            0.0,
            50.0,
            None,
        ),
        InputField::select(
            "job_applications_planned",
            "Planned Job Applications",
            &["Less than 10", "10-25", "26-50", "51-100", "More than 100"],
        ),
        InputField::select(
            "career_services_utilization",
            "Career Services Utilization",
            &["None", "Minimal", "Moderate", "Extensive"],
        ),
        InputField::select(
            "job_market_condition",
            "Current Job Market Condition",
            &["Very Poor", "Poor", "Neutral", "Good", "Excellent"],
        ),
    ]
}

/// Ordered input schema for a model name; unknown names get no inputs
pub fn schema_for(name: &str) -> Vec<InputField> {
    match name {
        CAREER_PATH_NAME => career_path_inputs(),
        EMPLOYMENT_PROBABILITY_NAME => employment_probability_inputs(),
        _ => Vec::new(),
    }
}

/// Models shipped with the workbench for when the backend has none
pub fn builtin_models() -> Vec<Model> {
    vec![
        Model::new(
            CAREER_PATH_NAME,
            "Predicts potential career paths based on academic background, skills, and experience",
            87.5,
            career_path_inputs(),
        ),
        Model::new(
            EMPLOYMENT_PROBABILITY_NAME,
            "Predicts the likelihood of employment within 6 months after graduation",
            89.2,
            employment_probability_inputs(),
        ),
    ]
}

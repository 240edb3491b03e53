//! Heuristic entity extraction from resume text
//!
//! Pulls candidate attributes out of unstructured text: skills, education and
//! experience signals, job titles, and spoken languages. Every extraction is a
//! pure function of the text; absence is an empty set or `None`, never a
//! missing field.

use crate::error::{Result, ScreenerError};
use crate::processing::lexicon::Lexicon;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Multi-domain skill lexicon: languages, frameworks, cloud/devops, databases,
/// tools, methodologies, design, business, and soft skills.
const SKILLS: &[&str] = &[
    // Programming languages
    "javascript", "python", "java", "c++", "c#", "ruby", "php", "swift", "kotlin", "go",
    // Web technologies
    "react", "angular", "vue", "node", "express", "django", "flask", "spring", "asp.net",
    "html", "css", "sass", "less", "bootstrap", "tailwind", "material-ui", "jquery",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "ci/cd", "terraform", "ansible",
    // Databases
    "sql", "mongodb", "postgresql", "mysql", "oracle", "nosql", "redis", "elasticsearch",
    // Tools & methodologies
    "git", "github", "gitlab", "bitbucket", "jira", "agile", "scrum", "kanban",
    // Operating systems
    "linux", "unix", "windows", "macos", "android", "ios",
    // Data science & AI
    "machine learning", "ai", "artificial intelligence", "data science", "neural networks",
    "tensorflow", "pytorch", "pandas", "numpy", "scikit-learn", "nlp", "computer vision",
    // Design
    "photoshop", "illustrator", "figma", "sketch", "adobe xd", "ui/ux", "wireframing",
    // Business
    "accounting", "finance", "marketing", "sales", "hr", "human resources", "crm",
    // Soft skills
    "management", "leadership", "communication", "teamwork", "problem solving",
    "critical thinking", "time management", "creativity", "adaptability", "negotiation",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "degree", "university", "college",
    "school", "diploma", "certification", "certificate", "mba", "bsc", "msc",
];

const UNIVERSITIES: &[&str] = &[
    "harvard", "stanford", "mit", "oxford", "cambridge", "yale", "princeton",
    "columbia", "berkeley", "chicago", "caltech", "imperial", "eth zurich",
    "tokyo", "toronto", "mcgill", "national university", "peking", "tsinghua",
];

const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience", "employment", "work history", "professional history",
    "career", "job history", "work experience", "position",
];

const COMPANIES: &[&str] = &[
    "google", "microsoft", "apple", "amazon", "facebook", "meta", "ibm", "oracle",
    "twitter", "linkedin", "netflix", "adobe", "salesforce", "intel", "cisco",
    "samsung", "sony", "tesla", "uber", "airbnb", "spotify",
];

const JOB_TITLES: &[&str] = &[
    "software engineer", "software developer", "web developer", "frontend developer",
    "backend developer", "full stack developer", "product manager", "project manager",
    "ui/ux designer", "data scientist", "data analyst", "business analyst",
    "marketing manager", "sales representative", "hr manager", "accountant",
    "financial analyst", "graphic designer", "network administrator",
    "system administrator", "devops engineer", "qa engineer", "quality assurance",
    "test engineer", "security engineer", "cloud architect", "solutions architect",
    "technical lead", "tech lead", "cto", "cio", "ceo",
];

const SPOKEN_LANGUAGES: &[&str] = &[
    "english", "french", "spanish", "german", "italian", "portuguese", "chinese",
    "japanese", "korean", "russian", "arabic", "hindi", "turkish", "dutch",
    "swedish", "greek", "polish", "vietnamese", "thai", "indonesian", "malay",
    "finnish", "danish", "norwegian",
];

/// Degree phrase patterns, scanned in this order over lowercased text.
const DEGREE_PATTERNS: &[&str] = &[
    r"bachelor(?:'s|s)? (?:of|in) [^,.]+",
    r"master(?:'s|s)? (?:of|in) [^,.]+",
    r"phd\.? (?:of|in) [^,.]+",
    r"doctorate (?:of|in) [^,.]+",
    r"\bmba\b",
    r"diploma in [^,.]+",
    r"certificate in [^,.]+",
    r"certified [^,.]+",
    r"\bbsc (?:in |of )?[^,.]+",
    r"\bmsc (?:in |of )?[^,.]+",
];

/// Years-of-experience phrasing variants; the first pattern that captures wins.
const EXPERIENCE_YEAR_PATTERNS: &[&str] = &[
    r"(\d+)\+? years? of experience",
    r"experience:? (\d+)\+? years?",
    r"experienced (?:for|with) (\d+)\+? years?",
    r"worked (?:for|with) (\d+)\+? years?",
    r"(\d+)\+? years? in ",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeProfile {
    pub skills: Vec<String>,
    pub education: EducationProfile,
    pub experience: ExperienceProfile,
    pub job_titles: Vec<String>,
    pub languages: Vec<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationProfile {
    pub has_education_signal: bool,
    /// Matched degree phrases in first-match order
    pub degree_phrases: Vec<String>,
    pub institutions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceProfile {
    pub years_of_experience: Option<u32>,
    pub has_experience_section: bool,
    pub companies: Vec<String>,
}

pub struct EntityExtractor {
    skills: Lexicon,
    education_keywords: Lexicon,
    universities: Lexicon,
    experience_keywords: Lexicon,
    companies: Lexicon,
    job_titles: Lexicon,
    spoken_languages: Lexicon,
    degree_patterns: Vec<Regex>,
    experience_year_patterns: Vec<Regex>,
    min_text_length: usize,
}

impl EntityExtractor {
    pub fn new() -> Result<Self> {
        Self::with_min_length(10)
    }

    pub fn with_min_length(min_text_length: usize) -> Result<Self> {
        let degree_patterns = DEGREE_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScreenerError::InvalidInput(format!("Invalid degree pattern: {}", e)))?;

        let experience_year_patterns = EXPERIENCE_YEAR_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScreenerError::InvalidInput(format!("Invalid experience pattern: {}", e)))?;

        Ok(Self {
            skills: Lexicon::new(SKILLS)?,
            education_keywords: Lexicon::new(EDUCATION_KEYWORDS)?,
            universities: Lexicon::new(UNIVERSITIES)?,
            experience_keywords: Lexicon::new(EXPERIENCE_KEYWORDS)?,
            companies: Lexicon::new(COMPANIES)?,
            job_titles: Lexicon::new(JOB_TITLES)?,
            spoken_languages: Lexicon::new(SPOKEN_LANGUAGES)?,
            degree_patterns,
            experience_year_patterns,
            min_text_length,
        })
    }

    /// Analyze resume text into a profile. Pure: no I/O, fully deterministic.
    pub fn analyze(&self, text: &str) -> Result<ResumeProfile> {
        if text.len() < self.min_text_length {
            return Err(ScreenerError::InsufficientText(format!(
                "text is {} characters, minimum is {}",
                text.len(),
                self.min_text_length
            )));
        }

        Ok(ResumeProfile {
            skills: self.skills.matches(text),
            education: self.extract_education(text),
            experience: self.extract_experience(text),
            job_titles: self.job_titles.matches(text),
            languages: self.spoken_languages.matches(text),
            word_count: text.split_whitespace().count(),
        })
    }

    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        self.skills.matches(text)
    }

    /// Education signals are independent and additive: keyword presence,
    /// degree phrase captures, and known institution names.
    fn extract_education(&self, text: &str) -> EducationProfile {
        let lower = text.to_lowercase();

        let mut degree_phrases = Vec::new();
        for pattern in &self.degree_patterns {
            for mat in pattern.find_iter(&lower) {
                degree_phrases.push(mat.as_str().trim().to_string());
            }
        }

        EducationProfile {
            has_education_signal: self.education_keywords.any_match(text),
            degree_phrases,
            institutions: self.universities.matches(text),
        }
    }

    fn extract_experience(&self, text: &str) -> ExperienceProfile {
        let lower = text.to_lowercase();

        let mut years_of_experience = None;
        for pattern in &self.experience_year_patterns {
            if let Some(caps) = pattern.captures(&lower) {
                if let Some(years) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                    years_of_experience = Some(years);
                    break;
                }
            }
        }

        ExperienceProfile {
            years_of_experience,
            has_experience_section: self.experience_keywords.any_match(text),
            companies: self.companies.matches(text),
        }
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

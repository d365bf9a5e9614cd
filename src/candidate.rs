// src/candidate.rs
//! Registration form and the candidate profile derived from it

use crate::utils::truncate_chars;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const OTHER_OPTION: &str = "Outro";
const OTHER_OPTION_EN: &str = "Other";

pub const AREA_OPTIONS: [&str; 9] = [
    "Desenvolvimento de Software",
    "Análise de Dados",
    "Inteligência Artificial",
    "Segurança da Informação",
    "DevOps",
    "UX/UI Design",
    "Gestão de Projetos",
    "QA/Testes",
    OTHER_OPTION,
];

pub const SECTOR_OPTIONS: [&str; 10] = [
    "Finanças",
    "Saúde",
    "Educação",
    "Varejo",
    "E-commerce",
    "Tecnologia",
    "Indústria",
    "Consultoria",
    "Governo",
    OTHER_OPTION,
];

/// Résumé text included in the agent request is capped at this many characters.
const SEARCH_RESUME_CHARS: usize = 3000;

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateForm {
    pub name: String,
    pub course: String,
    pub semester: String,
    pub areas: Vec<String>,
    pub other_area: String,
    pub sectors: Vec<String>,
    pub other_sector: String,
    pub resume: Option<ResumeUpload>,
    pub linkedin_url: String,
    pub privacy_consent: bool,
}

fn is_other(option: &str) -> bool {
    option == OTHER_OPTION || option == OTHER_OPTION_EN
}

fn final_list(selected: &[String], other: &str) -> Vec<String> {
    let mut list: Vec<String> = selected
        .iter()
        .filter(|option| !is_other(option))
        .cloned()
        .collect();
    if !other.trim().is_empty() {
        list.push(other.trim().to_string());
    }
    list
}

impl CandidateForm {
    /// Labels of every missing or invalid field, in form order.
    pub fn validate(&self, max_upload_mb: u64) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Nome Completo".to_string());
        }
        if self.course.trim().is_empty() {
            errors.push("Curso".to_string());
        }
        if self.areas.is_empty() {
            errors.push("Áreas de Interesse".to_string());
        }
        if self.areas.iter().any(|a| is_other(a)) && self.other_area.trim().is_empty() {
            errors.push("Especifique outra área".to_string());
        }
        if self.sectors.is_empty() {
            errors.push("Setores de Interesse".to_string());
        }
        if self.sectors.iter().any(|s| is_other(s)) && self.other_sector.trim().is_empty() {
            errors.push("Especifique outro setor".to_string());
        }
        match &self.resume {
            None => errors.push("Currículo".to_string()),
            Some(resume) if resume.content.is_empty() => errors.push("Currículo".to_string()),
            Some(resume) if resume.content.len() as u64 > max_upload_mb * 1024 * 1024 => {
                errors.push(format!("Currículo excede {} MB", max_upload_mb));
            }
            Some(_) => {}
        }
        if self.linkedin_url.trim().is_empty() {
            errors.push("URL do LinkedIn".to_string());
        }
        if !self.privacy_consent {
            errors.push("Política de privacidade".to_string());
        }

        errors
    }

    pub fn final_areas(&self) -> Vec<String> {
        final_list(&self.areas, &self.other_area)
    }

    pub fn final_sectors(&self) -> Vec<String> {
        final_list(&self.sectors, &self.other_sector)
    }

    /// Build the profile once the résumé and LinkedIn texts are known.
    pub fn into_profile(self, resume_text: String, linkedin_text: String) -> CandidateProfile {
        let areas = self.final_areas();
        let sectors = self.final_sectors();
        CandidateProfile {
            name: self.name.trim().to_string(),
            course: self.course.trim().to_string(),
            semester: self.semester,
            areas,
            sectors,
            linkedin_url: self.linkedin_url.trim().to_string(),
            linkedin_text,
            file_name: self.resume.map(|r| r.file_name).unwrap_or_default(),
            resume_text,
            timestamp: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub course: String,
    pub semester: String,
    pub areas: Vec<String>,
    pub sectors: Vec<String>,
    pub linkedin_url: String,
    pub linkedin_text: String,
    pub file_name: String,
    pub resume_text: String,
    pub timestamp: DateTime<Local>,
}

impl CandidateProfile {
    /// Request handed to the job search agent.
    pub fn search_request(&self) -> String {
        format!(
            "Com base no perfil abaixo, encontre vagas de emprego adequadas:\n\n\
             Nome: {}\n\
             Curso: {} ({})\n\
             Áreas de interesse: {}\n\
             Setores de interesse: {}\n\n\
             Resumo do currículo:\n{}\n\n\
             Perfil LinkedIn:\n{}\n\n\
             Encontre vagas adequadas para este perfil e formate-as de modo organizado.",
            self.name,
            self.course,
            self.semester,
            self.areas.join(", "),
            self.sectors.join(", "),
            truncate_chars(&self.resume_text, SEARCH_RESUME_CHARS),
            truncate_chars(&self.linkedin_text, SEARCH_RESUME_CHARS),
        )
    }

    /// Profile text given to the report generator.
    pub fn report_profile(&self) -> String {
        format!(
            "Nome: {}\n\
             Curso: {} ({})\n\
             Áreas de interesse: {}\n\
             Setores de interesse: {}\n\
             Resumo do currículo:\n{}\n\
             Perfil LinkedIn:\n{}",
            self.name,
            self.course,
            self.semester,
            self.areas.join(", "),
            self.sectors.join(", "),
            self.resume_text,
            self.linkedin_text,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CandidateForm {
        CandidateForm {
            name: "Ana Souza".to_string(),
            course: "Ciência da Computação".to_string(),
            semester: "5º Semestre".to_string(),
            areas: vec!["DevOps".to_string()],
            other_area: String::new(),
            sectors: vec!["Saúde".to_string()],
            other_sector: String::new(),
            resume: Some(ResumeUpload {
                file_name: "cv.pdf".to_string(),
                content: b"%PDF-1.4".to_vec(),
            }),
            linkedin_url: "https://linkedin.com/in/ana".to_string(),
            privacy_consent: true,
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(valid_form().validate(2).is_empty());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = CandidateForm::default().validate(2);
        assert_eq!(
            errors,
            vec![
                "Nome Completo",
                "Curso",
                "Áreas de Interesse",
                "Setores de Interesse",
                "Currículo",
                "URL do LinkedIn",
                "Política de privacidade",
            ]
        );
    }

    #[test]
    fn test_other_requires_free_text() {
        let mut form = valid_form();
        form.areas.push(OTHER_OPTION.to_string());
        form.sectors.push("Other".to_string());
        assert_eq!(
            form.validate(2),
            vec!["Especifique outra área", "Especifique outro setor"]
        );

        form.other_area = "Robótica".to_string();
        form.other_sector = "Agro".to_string();
        assert!(form.validate(2).is_empty());
        assert_eq!(form.final_areas(), vec!["DevOps", "Robótica"]);
        assert_eq!(form.final_sectors(), vec!["Saúde", "Agro"]);
    }

    #[test]
    fn test_resume_size_limit() {
        let mut form = valid_form();
        form.resume = Some(ResumeUpload {
            file_name: "cv.pdf".to_string(),
            content: vec![0; 2 * 1024 * 1024 + 1],
        });
        assert_eq!(form.validate(2), vec!["Currículo excede 2 MB"]);
        assert!(form.validate(3).is_empty());
    }

    #[test]
    fn test_profile_texts() {
        let profile = valid_form().into_profile(
            "Experiência com Rust".to_string(),
            "Ana Souza\nEngenheira".to_string(),
        );

        assert_eq!(profile.file_name, "cv.pdf");
        let request = profile.search_request();
        assert!(request.contains("Curso: Ciência da Computação (5º Semestre)"));
        assert!(request.contains("Áreas de interesse: DevOps"));
        assert!(request.contains("Resumo do currículo:\nExperiência com Rust"));

        let report = profile.report_profile();
        assert!(report.starts_with("Nome: Ana Souza\n"));
        assert!(report.ends_with("Perfil LinkedIn:\nAna Souza\nEngenheira"));
    }
}

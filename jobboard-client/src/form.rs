use serde::{Deserialize, Serialize};

/// Create-job form state, sent as the body of `POST /api/jobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobForm {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub salary_from: String,
    pub salary_to: String,
    pub job_description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub application_deadline: String,
}

const REQUIRED: [&str; 8] = [
    "jobTitle",
    "companyName",
    "location",
    "jobType",
    "jobDescription",
    "requirements",
    "responsibilities",
    "applicationDeadline",
];

impl JobForm {
    fn value(&self, field: &str) -> &str {
        match field {
            "jobTitle" => &self.job_title,
            "companyName" => &self.company_name,
            "location" => &self.location,
            "jobType" => &self.job_type,
            "jobDescription" => &self.job_description,
            "requirements" => &self.requirements,
            "responsibilities" => &self.responsibilities,
            "applicationDeadline" => &self.application_deadline,
            _ => "",
        }
    }

    /// First empty required field, reported as "Please fill in the job title".
    pub fn validate(&self) -> Result<(), String> {
        match REQUIRED.into_iter().find(|f| self.value(f).is_empty()) {
            Some(field) => Err(format!("Please fill in the {}", field_words(field))),
            None => Ok(()),
        }
    }
}

/// `applicationDeadline` -> `application deadline`.
fn field_words(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> JobForm {
        JobForm {
            job_title: "Engineer".into(),
            company_name: "Acme".into(),
            location: "Pune".into(),
            job_type: "full-time".into(),
            job_description: "d".into(),
            requirements: "r".into(),
            responsibilities: "s".into(),
            application_deadline: "2030-01-31".into(),
            ..Default::default()
        }
    }

    #[test]
    fn reports_first_missing_field_in_words() {
        assert_eq!(
            JobForm::default().validate(),
            Err("Please fill in the job title".to_string())
        );
        let mut form = complete();
        form.application_deadline.clear();
        assert_eq!(
            form.validate(),
            Err("Please fill in the application deadline".to_string())
        );
        assert_eq!(complete().validate(), Ok(()));
    }

    #[test]
    fn salaries_are_optional() {
        let form = complete();
        assert!(form.salary_from.is_empty());
        assert!(form.validate().is_ok());
    }
}

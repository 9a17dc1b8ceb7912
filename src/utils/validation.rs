// ==================== FORM VALIDATION ====================
// Validação client-side é apenas advisory — o backend revalida tudo aqui
// antes de qualquer escrita ou dispatch.

use crate::models::{FieldError, RegisterRequest};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // local@domain.tld — exige pelo menos um ponto no domínio e TLD com 2+ letras
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Valida uma submissão de inscrição contra as perguntas customizadas do evento.
/// Retorna um erro por campo — vazio significa submissão válida.
pub fn validate_registration(questions: &[String], request: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if request.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name".to_string(),
            message: "Name is required".to_string(),
        });
    }

    if request.email.trim().is_empty() {
        errors.push(FieldError {
            field: "email".to_string(),
            message: "Email is required".to_string(),
        });
    } else if !is_valid_email(&request.email) {
        errors.push(FieldError {
            field: "email".to_string(),
            message: "Please enter a valid email address".to_string(),
        });
    }

    // Uma resposta não-vazia por pergunta, keyed pelo índice
    for (index, question) in questions.iter().enumerate() {
        let key = index.to_string();
        let answered = request
            .custom_answers
            .get(&key)
            .map(|a| !a.trim().is_empty())
            .unwrap_or(false);

        if !answered {
            errors.push(FieldError {
                field: format!("custom_answers.{}", key),
                message: format!("An answer is required for \"{}\"", question),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request_with_answers(answers: &[(&str, &str)]) -> RegisterRequest {
        RegisterRequest {
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            company: None,
            address: None,
            custom_answers: answers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            notify_me: true,
        }
    }

    #[test]
    fn test_email_regex_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b.c")); // TLD com 1 letra
        assert!(!is_valid_email("@domain.com"));
        assert!(!is_valid_email("user@.com"));
    }

    #[test]
    fn test_all_answers_present() {
        let questions = vec!["T-shirt size".to_string(), "Dietary restriction".to_string()];
        let request = request_with_answers(&[("0", "M"), ("1", "None")]);
        assert!(validate_registration(&questions, &request).is_empty());
    }

    #[test]
    fn test_missing_answer_is_field_specific() {
        let questions = vec!["T-shirt size".to_string(), "Dietary restriction".to_string()];
        let request = request_with_answers(&[("0", "M")]);

        let errors = validate_registration(&questions, &request);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "custom_answers.1");
        assert!(errors[0].message.contains("Dietary restriction"));
    }

    #[test]
    fn test_blank_answer_counts_as_missing() {
        let questions = vec!["T-shirt size".to_string()];
        let request = request_with_answers(&[("0", "   ")]);

        let errors = validate_registration(&questions, &request);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "custom_answers.0");
    }

    #[test]
    fn test_name_and_email_required() {
        let mut request = request_with_answers(&[]);
        request.name = "".to_string();
        request.email = "invalid".to_string();

        let errors = validate_registration(&[], &request);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"email"));
    }
}

// ==================== REGISTRATION INTAKE ====================
// Inscrição pública num evento: valida os campos e as respostas às perguntas
// customizadas, checa duplicidade e insere. O índice único (event_id, email)
// no banco é o backstop do check-then-insert.

use crate::{
    database::MongoDB,
    models::{Event, RegisterRequest, RegisterResponse, Registration},
    utils::validation::validate_registration,
};
use mongodb::bson::{doc, oid::ObjectId};

const DUPLICATE_MESSAGE: &str = "This email is already registered for this event";

pub async fn register_attendee(
    db: &MongoDB,
    event_id: &str,
    request: RegisterRequest,
) -> RegisterResponse {
    // 1. Evento precisa existir
    let object_id = match ObjectId::parse_str(event_id) {
        Ok(id) => id,
        Err(_) => return failure("Invalid event ID".to_string()),
    };

    let events = db.collection::<Event>("events");
    let event = match events.find_one(doc! { "_id": object_id }).await {
        Ok(Some(event)) => event,
        Ok(None) => return failure("Event not found".to_string()),
        Err(e) => return failure(format!("Database error: {}", e)),
    };

    // 2. Validação de campos + respostas às perguntas customizadas
    let field_errors = validate_registration(&event.questions, &request);
    if !field_errors.is_empty() {
        return RegisterResponse {
            success: false,
            registration_id: None,
            error: Some("Please fix the highlighted fields".to_string()),
            field_errors,
        };
    }

    let email = request.email.trim().to_lowercase();

    // 3. Checagem de duplicidade para a mensagem amigável.
    // Submissões concorrentes do mesmo par podem passar as duas por aqui —
    // o índice único pega a segunda no insert.
    let registrations = db.collection::<Registration>("registrations");
    match registrations
        .find_one(doc! { "event_id": event_id, "email": &email })
        .await
    {
        Ok(Some(_)) => return failure(DUPLICATE_MESSAGE.to_string()),
        Ok(None) => {}
        Err(e) => return failure(format!("Database error: {}", e)),
    }

    // 4. Insert
    let registration = Registration {
        id: None,
        event_id: event_id.to_string(),
        name: request.name.trim().to_string(),
        email,
        phone: request.phone,
        company: request.company,
        address: request.address,
        custom_answers: request.custom_answers,
        notify_me: request.notify_me,
        registered_at: chrono::Utc::now().timestamp_millis(),
    };

    match registrations.insert_one(&registration).await {
        Ok(result) => {
            let registration_id = result
                .inserted_id
                .as_object_id()
                .map(|id| id.to_hex())
                .unwrap_or_default();

            log::info!(
                "✅ Registration {} created for event {} ({})",
                registration_id,
                event_id,
                registration.email
            );

            RegisterResponse {
                success: true,
                registration_id: Some(registration_id),
                error: None,
                field_errors: vec![],
            }
        }
        Err(e) => map_insert_error(&e.to_string()),
    }
}

/// E11000 = o par (event_id, email) perdeu a corrida para outra submissão
fn is_duplicate_key_error(message: &str) -> bool {
    message.contains("E11000")
}

fn map_insert_error(message: &str) -> RegisterResponse {
    if is_duplicate_key_error(message) {
        failure(DUPLICATE_MESSAGE.to_string())
    } else {
        failure(format!("Failed to save registration: {}", message))
    }
}

fn failure(error: String) -> RegisterResponse {
    RegisterResponse {
        success: false,
        registration_id: None,
        error: Some(error),
        field_errors: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_maps_to_friendly_notice() {
        // Mensagem real do driver quando o índice único (event_id, email) rejeita
        let message = "Kind: Command failed: Error code 11000 (DuplicateKey): \
                       E11000 duplicate key error collection: EventService.registrations \
                       index: event_id_1_email_1 dup key";

        assert!(is_duplicate_key_error(message));

        let response = map_insert_error(message);
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(DUPLICATE_MESSAGE));
        assert!(response.registration_id.is_none());
    }

    #[test]
    fn test_other_insert_errors_pass_through() {
        let response = map_insert_error("connection reset by peer");
        assert!(!response.success);
        assert!(response.error.unwrap().contains("connection reset by peer"));
    }
}

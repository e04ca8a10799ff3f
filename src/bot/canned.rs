//! Keyword-triggered canned replies.

use chrono::{DateTime, Local};

/// Reply used when nothing matches and no model is consulted.
pub const DEFAULT_REPLY: &str = "No entendí. ¿Puedes reformular tu pregunta?";

/// Keywords checked in this order; the first one contained in the message wins.
const KEYWORDS: [&str; 5] = [
    "hola",
    "qué puedes hacer",
    "qué hora es",
    "cuéntame un chiste",
    "adiós",
];

/// Find the canned reply for an already lower-cased message.
///
/// `now` is only used by the time question.
pub fn canned_reply(message: &str, now: DateTime<Local>) -> Option<String> {
    let keyword = KEYWORDS.iter().find(|k| message.contains(*k))?;
    let reply = match *keyword {
        "hola" => "¡Hola! ¿En qué puedo ayudarte?".to_string(),
        "qué puedes hacer" => "Puedo responder preguntas con la ayuda de IA avanzada".to_string(),
        "qué hora es" => format!("Son las {}", now.format("%H:%M")),
        "cuéntame un chiste" => {
            "¿Qué dice un semáforo a otro? ¡No me mires, me estoy cambiando! 😆".to_string()
        }
        _ => "¡Hasta luego! 💻".to_string(),
    };
    Some(reply)
}

//! Outbound message kinds and their JSON rendering.
//!
//! The bot only ever sends four kinds of message: the three step prompts
//! (each a buttons template carrying the next postback action) and plain
//! text. Texts exist in Japanese and English, selected per worker.

use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Message language for one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Ja,
    En,
}

impl Language {
    /// Parse the `workers.language` column value; anything unknown falls
    /// back to Japanese, the registry default.
    pub fn from_code(code: &str) -> Self {
        match code {
            "en" => Self::En,
            _ => Self::Ja,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::En => "en",
        }
    }
}

// ---------------------------------------------------------------------------
// OutboundMessage
// ---------------------------------------------------------------------------

/// One of the four message kinds the bot sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Morning prompt with the `wake_up` postback button.
    WakeUpPrompt,
    /// Follow-up prompt with the `on_the_way` postback button.
    OnTheWayPrompt,
    /// Follow-up prompt with the `arrived` postback button.
    ArrivedPrompt,
    /// Plain text.
    Text(String),
}

impl OutboundMessage {
    /// Render to a Messaging API message object.
    pub fn render(&self, lang: Language) -> Value {
        match self {
            Self::Text(text) => json!({ "type": "text", "text": text }),
            Self::WakeUpPrompt => buttons_template(
                match lang {
                    Language::Ja => "おはようございます！起床したらボタンを押してください。",
                    Language::En => "Good morning! Tap the button once you are awake.",
                },
                match lang {
                    Language::Ja => "起床済み",
                    Language::En => "Awake",
                },
                "action=wake_up",
            ),
            Self::OnTheWayPrompt => buttons_template(
                match lang {
                    Language::Ja => "起床を記録しました。出発したらボタンを押してください。",
                    Language::En => "Wake-up recorded. Tap the button when you leave for the site.",
                },
                match lang {
                    Language::Ja => "移動中",
                    Language::En => "On the way",
                },
                "action=on_the_way",
            ),
            Self::ArrivedPrompt => buttons_template(
                match lang {
                    Language::Ja => "出発を記録しました。現場に到着したらボタンを押してください。",
                    Language::En => "Departure recorded. Tap the button when you arrive at the site.",
                },
                match lang {
                    Language::Ja => "到着済み",
                    Language::En => "Arrived",
                },
                "action=arrived",
            ),
        }
    }
}

/// A single-button template message. The template `text` doubles as the
/// `altText` shown on devices that cannot render templates.
fn buttons_template(text: &str, label: &str, data: &str) -> Value {
    json!({
        "type": "template",
        "altText": text,
        "template": {
            "type": "buttons",
            "text": text,
            "actions": [
                { "type": "postback", "label": label, "data": data }
            ]
        }
    })
}

// ---------------------------------------------------------------------------
// Canned texts
// ---------------------------------------------------------------------------

/// Reply to a `follow` event.
pub fn welcome_text(lang: Language) -> String {
    match lang {
        Language::Ja => "友だち追加ありがとうございます！お名前を返信して登録してください。",
        Language::En => "Thanks for adding me! Reply with your name to finish registration.",
    }
    .to_string()
}

/// Confirmation after the first text message sets the worker's name.
pub fn name_registered_text(lang: Language, name: &str) -> String {
    match lang {
        Language::Ja => format!("{name}さんを登録しました。毎朝のチェックインをお願いします。"),
        Language::En => format!("Registered as {name}. Please check in every morning."),
    }
}

/// Fallback reply for text from an already-registered worker.
pub fn fallback_text(lang: Language) -> String {
    match lang {
        Language::Ja => "ご用件がある場合は管理者に直接ご連絡ください。",
        Language::En => "If you need anything, please contact your manager directly.",
    }
    .to_string()
}

/// Closing confirmation after the `arrived` step (terminal for the day).
pub fn arrival_recorded_text(lang: Language) -> String {
    match lang {
        Language::Ja => "到着を記録しました。今日もご安全に！",
        Language::En => "Arrival recorded. Have a safe day!",
    }
    .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

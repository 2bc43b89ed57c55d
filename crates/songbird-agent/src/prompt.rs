//! System prompts and transcript rendering for the agent roles.

use chrono::NaiveDate;
use songbird_booking::Intent;
use songbird_memory::{Channel, Turn, TurnRole};

use crate::client::ChatMessage;
use crate::context::SessionContext;

fn intent_catalogue() -> String {
    Intent::ALL
        .iter()
        .map(|intent| {
            let mut line = format!(
                "- {}: required {}",
                intent,
                intent.required_fields().join(", ")
            );
            let optional = intent.optional_fields();
            if !optional.is_empty() {
                let label = match intent {
                    Intent::ModifyReservation => "at least one of",
                    _ => "optional",
                };
                line.push_str(&format!("; {label} {}", optional.join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn today_line(today: NaiveDate) -> String {
    format!(
        "Today is {} ({}).",
        today.format("%A, %B %-d, %Y"),
        today.format("%Y-%m-%d")
    )
}

/// System prompt for the receptionist.
pub fn receptionist_system_prompt(restaurant: &str, today: NaiveDate) -> String {
    format!(
        "{today}\n\
You are a warm, efficient receptionist for {restaurant}, a restaurant.\n\
You can perform these booking services:\n{catalogue}\n\n\
Output exactly ONE JSON object and nothing else, in one of two shapes:\n\
{{\"channel\":\"to_user\",\"message\":\"<text for the guest>\"}}\n\
{{\"channel\":\"to_data_entry\",\"instruction\":{{\"intent\":\"<service>\",\"parameters\":{{...}}}}}}\n\n\
Rules:\n\
- Use to_user to greet, to ask for missing required details, or to present results.\n\
- Use to_data_entry only when every required detail of exactly one service is known.\n\
- Put the guest's values in parameters as they stated them (dates may be relative).\n\
- Never claim a booking is made, changed or cancelled until a booking system result confirms it.\n\
- If a booking system result reports a failure, apologise and offer to try again.\n\
- Keep replies short and friendly. No keys other than the ones shown.",
        today = today_line(today),
        catalogue = intent_catalogue(),
    )
}

/// System prompt for the data entry worker.
pub fn data_entry_system_prompt(today: NaiveDate) -> String {
    format!(
        "{today}\n\
You are the data entry worker of a restaurant booking desk. You never talk to guests.\n\
Convert the receptionist's instruction into the fields of one booking service:\n{catalogue}\n\n\
Field formats: date YYYY-MM-DD, time HH:MM (24h), party_size integer, \
reservation_id as given, name, phone and special_requests as given.\n\
Resolve values from the instruction and the conversation. Omit any field you cannot resolve; never invent one.\n\
Output exactly ONE JSON object and nothing else:\n\
{{\"intent\":\"<service>\",\"fields\":{{...}}}}",
        today = today_line(today),
        catalogue = intent_catalogue(),
    )
}

/// System prompt for session summarization.
pub const SUMMARIZER_SYSTEM_PROMPT: &str = "Summarize this restaurant booking conversation for \
long-term memory. Cover the guest's intents, bookings made or changed, booking references, \
dates, times, party sizes and final outcomes. Use only facts from the transcript. Keep it to \
two or three sentences.";

/// One transcript line for a turn.
pub fn render_turn(turn: &Turn) -> String {
    let label = match (turn.role(), turn.channel()) {
        (TurnRole::User, _) => "Guest",
        (TurnRole::Receptionist, Some(Channel::ToDataEntry)) => "Receptionist (to data entry)",
        (TurnRole::Receptionist, _) => "Receptionist",
        (TurnRole::DataEntry, _) => "Data entry",
        (TurnRole::Tool, _) => "Booking system",
    };
    format!("{label}: {}", turn.content().render())
}

/// Chat messages for a receptionist call.
///
/// Guest turns become user messages and receptionist turns assistant
/// messages in the JSON shape the model must produce; internal turns are
/// relayed as user messages labelled with their source.
pub fn receptionist_messages(
    system: String,
    ctx: &SessionContext,
    user_message: &str,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system)];

    if let Some(summary) = &ctx.summary {
        messages.push(ChatMessage::system(format!(
            "Summary of this guest's previous conversation: {summary}"
        )));
    }

    for turn in &ctx.recent {
        messages.push(match turn.role() {
            TurnRole::User => ChatMessage::user(turn.content().render()),
            TurnRole::Receptionist => ChatMessage::assistant(receptionist_json(turn)),
            TurnRole::DataEntry | TurnRole::Tool => ChatMessage::user(render_turn(turn)),
        });
    }

    if ctx.last_user_message().as_deref() != Some(user_message) {
        messages.push(ChatMessage::user(user_message));
    }

    if let Some(result) = &ctx.tool_result {
        messages.push(ChatMessage::system(format!(
            "Booking system result for your last instruction: {}\n\
Reply to the guest now using the to_user channel.",
            result.to_value()
        )));
    }

    if let Some(correction) = &ctx.correction {
        messages.push(ChatMessage::system(correction.clone()));
    }

    messages
}

fn receptionist_json(turn: &Turn) -> String {
    match turn.channel() {
        Some(Channel::ToDataEntry) => format!(
            "{{\"channel\":\"to_data_entry\",\"instruction\":{}}}",
            turn.content().render()
        ),
        _ => serde_json::json!({"channel": "to_user", "message": turn.content().render()})
            .to_string(),
    }
}

/// Plain transcript of turns, one per line.
pub fn transcript(turns: &[Turn]) -> String {
    turns.iter().map(render_turn).collect::<Vec<_>>().join("\n")
}

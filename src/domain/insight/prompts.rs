//! Prompt builders for the coaching and report requests.

use serde_json::Value;

use crate::domain::cycle::DayEntry;
use crate::domain::foundation::DayIndex;
use crate::domain::program::DAILY_TASKS;

/// Upper bound on coaching feedback, stated to the model.
pub const FEEDBACK_MAX_WORDS: u32 = 80;

/// Builds the free-text coaching prompt for one day.
pub fn daily_feedback_prompt(day: DayIndex, user_input: &str) -> String {
    let mut prompt = format!(
        "系統：你是「地藏語氣」的理性教練。輸出需短、具體、可執行，每次不超過 {} 字，並對應八階步驟的語氣。\n\
         使用者的本日任務 index: {}\n\
         使用者的輸入: \"{}\"\n\n\
         根據對應的八階步驟語氣，生成你的回饋。\n\n\
         八階步驟語氣參考:\n",
        FEEDBACK_MAX_WORDS,
        day.value(),
        user_input
    );

    for task in &DAILY_TASKS {
        let label = task.title.split('｜').next().unwrap_or(task.title);
        prompt.push_str(&format!("D{}（{}）: 「{}」\n", task.day, label, task.coach_tone));
    }

    prompt
}

/// Builds the structured report prompt from a cycle's entries.
///
/// Entries are listed by day regardless of the order given.
pub fn weekly_insight_prompt(entries: &[DayEntry]) -> String {
    let mut sorted: Vec<&DayEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.day_index);

    let formatted = sorted
        .iter()
        .map(|e| {
            format!(
                "Day {}: {}",
                e.day_index.value(),
                Value::Object(e.raw_input.as_map().clone())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a compassionate and insightful psychoanalyst named 'Ksitigarbha Coach'. Your tone is rational, supportive, and concise.\n\
         A user has completed a 7-day self-awareness journey. Their entries are provided below.\n\
         Your task is to analyze these entries and generate a final insight report in JSON format.\n\n\
         User's 7-Day Entries:\n\
         {formatted}\n\n\
         Based on the user's journey, perform the following actions:\n\
         1. **Generate a 'weekly_summary'**: A brief, encouraging summary (max 120 words in Traditional Chinese) of their progress, acknowledging their courage and key breakthrough.\n\
         2. **Extract 'keywords'**: Identify 2-3 key emotional themes or recurring concepts (in Traditional Chinese) from their entries.\n\
         3. **Create 'radar' scores**: Rate the user's engagement on a scale of 0 to 100 for each of the five dimensions:\n\
         - observe: How well did they notice their internal thoughts and external triggers (Day 1, 3)?\n\
         - verify: How much courage did they show in testing their fears with others (Day 4)?\n\
         - refine: How effectively did they transform a fear into a positive action (Day 5)?\n\
         - act: How well did they follow through with their intended action (Day 6)?\n\
         - integrate: How profound was their final reflection and overall self-awareness gain (Day 7)?\n\
         Base your scores on the depth, honesty, and effort reflected in their writing. Be realistic; not everyone gets 100. A typical range is 40-85.\n"
    )
}

//! The fixed seven-day program.
//!
//! # Day Order
//!
//! 1. 觀察 Observation → 2. 定義 Definition → 3. 拆解 Deconstruction →
//! 4. 驗證 Verification → 5. 修正 Refinement → 6. 生成 Generation →
//! 7. 整合 Integration
//!
//! Task content is fixed copy; users cannot edit it.

use crate::domain::foundation::DayIndex;

/// One day's task as shown on the daily card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTask {
    pub day: u8,
    pub title: &'static str,
    pub prompt: &'static str,
    pub instruction: &'static str,
    /// Tone line the coach is asked to follow for this day.
    pub coach_tone: &'static str,
}

/// Day-4 openers the user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HonestyScript {
    pub id: &'static str,
    pub text: &'static str,
}

pub const DAILY_TASKS: [DailyTask; 7] = [
    DailyTask {
        day: 1,
        title: "觀察｜Observation",
        prompt: "記錄 3 個讓你脫口而出「我覺得 / 我認為...」的瞬間。",
        instruction: "不用分析，只要像個記者般記下事實。",
        coach_tone: "我看到你在＿＿＿情境會用『我覺得…』打頭，這通常在保護自己。今天先記錄，不要評價。",
    },
    DailyTask {
        day: 2,
        title: "定義｜Definition",
        prompt: "寫一句話總結：「我害怕被看成...」",
        instruction: "一句話就好，越直接，力量越大。",
        coach_tone: "把害怕說成一句話就好：『我害怕被看成＿＿＿。』簡短、誠實、不要包裝。",
    },
    DailyTask {
        day: 3,
        title: "拆解｜Deconstruction",
        prompt: "針對昨天的害怕，誠實回答這三個問題：",
        instruction: "感受是主觀的，但事實是客觀的。我們來區分一下。",
        coach_tone: "問自己三次：會真的發生嗎？失去什麼？那個損失是想像嗎？在空格後簡答三行。",
    },
    DailyTask {
        day: 4,
        title: "驗證｜Verification",
        prompt: "選一位安全的對象（或自己），用下面的「微誠實腳本」開啟對話，並記錄對方的回應。",
        instruction: "透明不是獨白，而是互動。這是最勇敢的一步。",
        coach_tone: "選一個安全的人，用以下句子 A/B/C 任一，請對方回 1 句感受。截圖或抄錄下來。",
    },
    DailyTask {
        day: 5,
        title: "修正｜Refinement",
        prompt: "將 Day 2 的「我害怕...」改寫成一句具體的行動句。",
        instruction: "從恐懼到意願，是改變的開始。格式：我願意...",
        coach_tone: "把『我害怕＿＿』改寫成行動句：『我願意今天在＿＿情境，說＿＿＿。』只要一句。",
    },
    DailyTask {
        day: 6,
        title: "生成｜Generation",
        prompt: "寫下 200 字以內的故事：「今天我說了真話，然後...」",
        instruction: "無論結果如何，記錄本身就是一種勝利。",
        coach_tone: "寫 100–200 字：今天我說了真話，然後＿＿＿。不求完美，求真實。",
    },
    DailyTask {
        day: 7,
        title: "整合｜Integration",
        prompt: "回顧這一週，你最驚訝的發現是什麼？",
        instruction: "寫下來，然後讓我為你總結這一週的旅程。",
        coach_tone: "你一週裡最驚訝的發現是＿＿＿。我會幫你整理摘要與雷達。",
    },
];

pub const MICRO_HONESTY_SCRIPTS: [HonestyScript; 3] = [
    HonestyScript {
        id: "script1",
        text: "我在試著讓自己更誠實。現在我其實在擔心＿＿＿，想跟你說真話看看。",
    },
    HonestyScript {
        id: "script2",
        text: "我不確定怎麼表達，但我想先說：我在意＿＿＿。我需要你的 2 分鐘回應。",
    },
    HonestyScript {
        id: "script3",
        text: "今天我練習透明，所以直接說：我怕被看成＿＿＿。你願意回我一個感受嗎？",
    },
];

pub const WEEKLY_REPORT_COVER_QUOTE: &str = "透明不是裸露，是允許自己被看見。";

/// Returns the task for a day.
pub fn task_for(day: DayIndex) -> &'static DailyTask {
    &DAILY_TASKS[day.position()]
}

//! Self-contained wellness utilities backing the client screens: a password
//! strength meter, a breathing-exercise pacer, and a sleep-cycle calculator.
//! All pure functions of their inputs; the UI layer owns clocks and audio.

use serde::Serialize;

// ========================================
// Password strength
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    Weak,
    Fair,
    Strong,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordStrength {
    /// 0..=12: length tier plus 2 points per character class present
    pub score: u8,
    pub label: StrengthLabel,
    /// What is missing, phrased for direct display under the input
    pub issues: Vec<String>,
}

const SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| SYMBOLS.contains(c));

    let mut issues = Vec::new();
    if length < 8 {
        issues.push("Use at least 8 characters".to_string());
    }
    if !has_upper {
        issues.push("Add an uppercase letter".to_string());
    }
    if !has_lower {
        issues.push("Add a lowercase letter".to_string());
    }
    if !has_digit {
        issues.push("Add a digit".to_string());
    }
    if !has_symbol {
        issues.push("Add a special character".to_string());
    }

    let length_score: u8 = if length >= 12 {
        4
    } else if length >= 8 {
        3
    } else {
        1
    };
    let complexity_score = [has_upper, has_lower, has_digit, has_symbol]
        .iter()
        .filter(|present| **present)
        .count() as u8
        * 2;

    let score = length_score + complexity_score;
    let label = if score >= 10 {
        StrengthLabel::Strong
    } else if score >= 7 {
        StrengthLabel::Fair
    } else {
        StrengthLabel::Weak
    };

    PasswordStrength { score, label, issues }
}

// ========================================
// Breathing exercise pacer
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathingExercise {
    Relaxation,
    Focus,
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
    Done,
}

#[derive(Debug, Clone, Copy)]
pub struct BreathingPattern {
    pub inhale_secs: u32,
    pub hold_secs: u32,
    pub exhale_secs: u32,
    pub cycles: u32,
}

impl BreathingExercise {
    pub fn pattern(self) -> BreathingPattern {
        match self {
            // 4-4-6 for winding down, 4-2-4 for focus, 4-7-8 before sleep
            BreathingExercise::Relaxation => {
                BreathingPattern { inhale_secs: 4, hold_secs: 4, exhale_secs: 6, cycles: 10 }
            }
            BreathingExercise::Focus => {
                BreathingPattern { inhale_secs: 4, hold_secs: 2, exhale_secs: 4, cycles: 15 }
            }
            BreathingExercise::Sleep => {
                BreathingPattern { inhale_secs: 4, hold_secs: 7, exhale_secs: 8, cycles: 8 }
            }
        }
    }
}

impl BreathingPattern {
    pub fn cycle_secs(&self) -> u32 {
        self.inhale_secs + self.hold_secs + self.exhale_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.cycle_secs() * self.cycles
    }

    /// Phase at a given elapsed second, with seconds remaining in that phase.
    /// The UI re-renders from this each tick instead of juggling timers.
    pub fn phase_at(&self, elapsed_secs: u32) -> (BreathPhase, u32) {
        if elapsed_secs >= self.total_secs() {
            return (BreathPhase::Done, 0);
        }
        let within = elapsed_secs % self.cycle_secs();
        if within < self.inhale_secs {
            (BreathPhase::Inhale, self.inhale_secs - within)
        } else if within < self.inhale_secs + self.hold_secs {
            (BreathPhase::Hold, self.inhale_secs + self.hold_secs - within)
        } else {
            (BreathPhase::Exhale, self.cycle_secs() - within)
        }
    }
}

// ========================================
// Sleep-cycle calculator
// ========================================

/// One full sleep cycle.
const CYCLE_MINUTES: u32 = 90;
/// Average time to fall asleep.
const FALL_ASLEEP_MINUTES: u32 = 15;
/// Recommended cycle counts, best first when read backwards from wake-up.
const RECOMMENDED_CYCLES: [u32; 3] = [4, 5, 6];

const DAY_MINUTES: u32 = 24 * 60;

fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    let (h, m) = (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?);
    if h < 24 && m < 60 {
        Some(h * 60 + m)
    } else {
        None
    }
}

fn format_hhmm(total_minutes: u32) -> String {
    let wrapped = total_minutes % DAY_MINUTES;
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Bedtimes that land a 4/5/6-cycle night ending at `wake_up_time` (HH:MM),
/// accounting for the time it takes to fall asleep.
pub fn bed_times_for_wake_up(wake_up_time: &str) -> Option<Vec<String>> {
    let wake = parse_hhmm(wake_up_time)?;
    Some(
        RECOMMENDED_CYCLES
            .iter()
            .map(|cycles| {
                let asleep = cycles * CYCLE_MINUTES + FALL_ASLEEP_MINUTES;
                format_hhmm(wake + DAY_MINUTES - (asleep % DAY_MINUTES))
            })
            .collect(),
    )
}

/// Wake-up times completing 4/5/6 full cycles after going to bed at
/// `bed_time` (HH:MM).
pub fn wake_times_for_bed_time(bed_time: &str) -> Option<Vec<String>> {
    let bed = parse_hhmm(bed_time)?;
    Some(
        RECOMMENDED_CYCLES
            .iter()
            .map(|cycles| format_hhmm(bed + cycles * CYCLE_MINUTES + FALL_ASLEEP_MINUTES))
            .collect(),
    )
}

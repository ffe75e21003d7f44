use log::warn;
use serde::{Deserialize, Serialize};

/// The twelve equal-tempered pitch classes. Flat spellings are accepted by
/// the parser and normalized to their sharp equivalents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

pub const ALL_PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

impl PitchClass {
    /// Semitone offset within the octave (C = 0 .. B = 11).
    pub fn semitone(self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::CSharp => 1,
            PitchClass::D => 2,
            PitchClass::DSharp => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::FSharp => 6,
            PitchClass::G => 7,
            PitchClass::GSharp => 8,
            PitchClass::A => 9,
            PitchClass::ASharp => 10,
            PitchClass::B => 11,
        }
    }

    pub fn from_semitone(semitone: u32) -> PitchClass {
        ALL_PITCH_CLASSES[(semitone % 12) as usize]
    }

    /// Parses sharp ("C#") and flat ("Db") spellings. Fails closed on
    /// anything it does not recognize.
    pub fn parse(name: &str) -> Option<PitchClass> {
        match name {
            "C" => Some(PitchClass::C),
            "C#" | "Db" => Some(PitchClass::CSharp),
            "D" => Some(PitchClass::D),
            "D#" | "Eb" => Some(PitchClass::DSharp),
            "E" | "Fb" => Some(PitchClass::E),
            "F" => Some(PitchClass::F),
            "F#" | "Gb" => Some(PitchClass::FSharp),
            "G" => Some(PitchClass::G),
            "G#" | "Ab" => Some(PitchClass::GSharp),
            "A" => Some(PitchClass::A),
            "A#" | "Bb" => Some(PitchClass::ASharp),
            "B" | "Cb" => Some(PitchClass::B),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

/// Formats a pitch as "E1", "C#2", etc.
pub fn full_name(pitch_class: PitchClass, octave: i32) -> String {
    format!("{}{}", pitch_class.label(), octave)
}

/// The open-string pitch of a single string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTuning {
    pub pitch_class: PitchClass,
    pub octave: i32,
}

impl StringTuning {
    pub const fn new(pitch_class: PitchClass, octave: i32) -> StringTuning {
        StringTuning { pitch_class, octave }
    }
}

/// The tuning for all strings, highest-pitched string first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    strings: Vec<StringTuning>,
}

impl Tuning {
    pub fn new(strings: Vec<StringTuning>) -> Tuning {
        Tuning { strings }
    }

    /// Standard 4-string bass tuning (G-D-A-E).
    pub fn standard() -> Tuning {
        Tuning::new(vec![
            StringTuning::new(PitchClass::G, 2),
            StringTuning::new(PitchClass::D, 2),
            StringTuning::new(PitchClass::A, 1),
            StringTuning::new(PitchClass::E, 1),
        ])
    }

    /// Drop D tuning (G-D-A-D).
    pub fn drop_d() -> Tuning {
        Tuning::new(vec![
            StringTuning::new(PitchClass::G, 2),
            StringTuning::new(PitchClass::D, 2),
            StringTuning::new(PitchClass::A, 1),
            StringTuning::new(PitchClass::D, 1),
        ])
    }

    /// Half step down (Gb-Db-Ab-Eb).
    pub fn half_step_down() -> Tuning {
        Tuning::new(vec![
            StringTuning::new(PitchClass::FSharp, 2),
            StringTuning::new(PitchClass::CSharp, 2),
            StringTuning::new(PitchClass::GSharp, 1),
            StringTuning::new(PitchClass::DSharp, 1),
        ])
    }

    /// Full step down (F-C-G-D).
    pub fn full_step_down() -> Tuning {
        Tuning::new(vec![
            StringTuning::new(PitchClass::F, 2),
            StringTuning::new(PitchClass::C, 2),
            StringTuning::new(PitchClass::G, 1),
            StringTuning::new(PitchClass::D, 1),
        ])
    }

    /// Standard 5-string bass tuning (G-D-A-E-B).
    pub fn five_string() -> Tuning {
        Tuning::new(vec![
            StringTuning::new(PitchClass::G, 2),
            StringTuning::new(PitchClass::D, 2),
            StringTuning::new(PitchClass::A, 1),
            StringTuning::new(PitchClass::E, 1),
            StringTuning::new(PitchClass::B, 0),
        ])
    }

    /// Parses a preset name ("standard", "drop-d", "half-step-down",
    /// "full-step-down", "5-string") or a custom comma list such as
    /// "G2,D2,A1,D1". Unrecognized input falls back to standard tuning.
    pub fn parse(name: &str) -> Tuning {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "" | "standard" => return Tuning::standard(),
            "drop-d" => return Tuning::drop_d(),
            "half-step-down" => return Tuning::half_step_down(),
            "full-step-down" => return Tuning::full_step_down(),
            "5-string" => return Tuning::five_string(),
            _ => {}
        }

        let parts: Vec<&str> = name.split(',').map(str::trim).collect();
        if parts.len() >= 4 {
            let mut strings = Vec::with_capacity(parts.len());
            for part in &parts {
                if let Some(string) = parse_custom_string(part) {
                    strings.push(string);
                } else {
                    warn!("Unparseable string '{}' in tuning '{}', using standard.", part, name);
                    return Tuning::standard();
                }
            }
            return Tuning::new(strings);
        }

        warn!("Unknown tuning '{}', using standard.", name);
        Tuning::standard()
    }

    pub fn string(&self, index: usize) -> Option<StringTuning> {
        self.strings.get(index).copied()
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::standard()
    }
}

fn parse_custom_string(part: &str) -> Option<StringTuning> {
    if part.len() < 2 || !part.is_ascii() {
        return None;
    }
    let (name, octave) = part.split_at(part.len() - 1);
    let octave: i32 = octave.parse().ok()?;
    // The note-name portion arrives lowercased from the preset check, so
    // normalize to the "G#"/"Gb" spellings the pitch-class parser expects.
    let mut normalized = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            normalized.extend(c.to_uppercase());
        } else {
            normalized.push(c);
        }
    }
    let pitch_class = PitchClass::parse(&normalized)?;
    Some(StringTuning::new(pitch_class, octave))
}

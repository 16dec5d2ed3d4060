//! 音符和旋律定义

/// 音符
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub freq: u32,
    pub duration_ms: u32,
}

impl Note {
    pub const fn new(freq: u32, duration_ms: u32) -> Self {
        Self { freq, duration_ms }
    }
}

/// 闹钟铃声
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Melody {
    Twinkle,
    FurElise,
    OdeToJoy,
    Canon,
    Birthday,
}

const TWINKLE: [Note; 7] = [
    Note::new(392, 300),
    Note::new(392, 300),
    Note::new(440, 300),
    Note::new(440, 300),
    Note::new(392, 300),
    Note::new(392, 300),
    Note::new(330, 600),
];

const FUR_ELISE: [Note; 8] = [
    Note::new(659, 200),
    Note::new(622, 200),
    Note::new(659, 200),
    Note::new(622, 200),
    Note::new(659, 200),
    Note::new(494, 200),
    Note::new(587, 200),
    Note::new(523, 400),
];

const ODE_TO_JOY: [Note; 8] = [
    Note::new(330, 250),
    Note::new(330, 250),
    Note::new(349, 250),
    Note::new(392, 250),
    Note::new(392, 250),
    Note::new(349, 250),
    Note::new(330, 250),
    Note::new(294, 250),
];

const CANON: [Note; 7] = [
    Note::new(523, 300),
    Note::new(494, 300),
    Note::new(440, 300),
    Note::new(392, 300),
    Note::new(440, 300),
    Note::new(494, 300),
    Note::new(523, 600),
];

const BIRTHDAY: [Note; 6] = [
    Note::new(392, 200),
    Note::new(392, 200),
    Note::new(440, 400),
    Note::new(392, 400),
    Note::new(523, 400),
    Note::new(494, 800),
];

impl Melody {
    /// Tone selectors run 1..=5; anything else falls back to the first tune.
    pub const fn for_tone(tone: u8) -> Self {
        match tone {
            2 => Melody::FurElise,
            3 => Melody::OdeToJoy,
            4 => Melody::Canon,
            5 => Melody::Birthday,
            _ => Melody::Twinkle,
        }
    }

    pub const fn notes(&self) -> &'static [Note] {
        match self {
            Melody::Twinkle => &TWINKLE,
            Melody::FurElise => &FUR_ELISE,
            Melody::OdeToJoy => &ODE_TO_JOY,
            Melody::Canon => &CANON,
            Melody::Birthday => &BIRTHDAY,
        }
    }
}

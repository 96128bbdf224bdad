/// Note-string mini-language, as used by the classic `PLAY` statement.
///
///   T n    tempo, quarter notes per minute (32..=255, default 120)
///   O n    octave (0..=6, default 4); octave 3 starts at middle C
///   < >    octave down / up
///   L n    default note length, 1 = whole .. 64 (default 4)
///   A..G   note, optional `#`/`+` (sharp) or `-` (flat), optional length, dots
///   N n    note number 1..=84 (0 is a rest)
///   P n    pause (also `R`), with optional dots
///   MN ML MS   normal / legato / staccato
///   MF MB      foreground / background (accepted, playback is always async)
///
/// Anything else is skipped.

const MIDDLE_C: f32 = 261.63;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tone {
    /// None for a rest.
    pub freq: Option<f32>,
    /// Full slot length in seconds.
    pub secs: f32,
    /// Fraction of the slot that actually sounds.
    pub sounding: f32,
}

#[derive(Clone, Copy)]
enum Articulation {
    Normal,
    Legato,
    Staccato,
}

impl Articulation {
    fn fraction(self) -> f32 {
        match self {
            Articulation::Normal => 7.0 / 8.0,
            Articulation::Legato => 1.0,
            Articulation::Staccato => 3.0 / 4.0,
        }
    }
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    tempo: u32,
    octave: i32,
    length: u32,
    articulation: Articulation,
}

pub fn parse(tune: &str) -> Vec<Tone> {
    let mut p = Parser {
        chars: tune.chars().peekable(),
        tempo: 120,
        octave: 4,
        length: 4,
        articulation: Articulation::Normal,
    };
    let mut tones = Vec::new();

    while let Some(c) = p.chars.next() {
        match c.to_ascii_uppercase() {
            'T' => {
                if let Some(n) = p.number() {
                    p.tempo = n.clamp(32, 255);
                }
            }
            'O' => {
                if let Some(n) = p.number() {
                    p.octave = n.min(6) as i32;
                }
            }
            '<' => p.octave = (p.octave - 1).max(0),
            '>' => p.octave = (p.octave + 1).min(6),
            'L' => {
                if let Some(n) = p.number() {
                    p.length = n.clamp(1, 64);
                }
            }
            'M' => {
                match p.chars.peek().map(|c| c.to_ascii_uppercase()) {
                    Some('N') => p.articulation = Articulation::Normal,
                    Some('L') => p.articulation = Articulation::Legato,
                    Some('S') => p.articulation = Articulation::Staccato,
                    Some('F') | Some('B') => {}
                    _ => continue,
                }
                p.chars.next();
            }
            'N' => {
                if let Some(n) = p.number() {
                    let freq = match n.min(84) {
                        0 => None,
                        n => {
                            let octave = ((n - 1) / 12) as i32;
                            let semitone = ((n - 1) % 12) as i32;
                            Some(frequency(octave, semitone))
                        }
                    };
                    tones.push(p.tone(freq, p.length, 0));
                }
            }
            'P' | 'R' => {
                let len = p.number().unwrap_or(p.length).clamp(1, 64);
                let dots = p.dots();
                tones.push(p.tone(None, len, dots));
            }
            note @ 'A'..='G' => {
                let mut semitone = match note {
                    'C' => 0,
                    'D' => 2,
                    'E' => 4,
                    'F' => 5,
                    'G' => 7,
                    'A' => 9,
                    _ => 11,
                };
                match p.chars.peek() {
                    Some('#') | Some('+') => {
                        semitone += 1;
                        p.chars.next();
                    }
                    Some('-') => {
                        semitone -= 1;
                        p.chars.next();
                    }
                    _ => {}
                }
                let len = p.number().map(|n| n.clamp(1, 64)).unwrap_or(p.length);
                let dots = p.dots();
                let freq = frequency(p.octave, semitone);
                tones.push(p.tone(Some(freq), len, dots));
            }
            _ => {}
        }
    }
    tones
}

fn frequency(octave: i32, semitone: i32) -> f32 {
    let steps = (octave - 3) * 12 + semitone;
    MIDDLE_C * 2f32.powf(steps as f32 / 12.0)
}

impl Parser<'_> {
    fn number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(d) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d));
            self.chars.next();
        }
        value
    }

    fn dots(&mut self) -> u32 {
        let mut n = 0;
        while self.chars.peek() == Some(&'.') {
            n += 1;
            self.chars.next();
        }
        n
    }

    fn tone(&self, freq: Option<f32>, length: u32, dots: u32) -> Tone {
        let whole = 240.0 / self.tempo as f32;
        let secs = whole / length as f32 * 1.5f32.powi(dots as i32);
        let sounding = if freq.is_some() { self.articulation.fraction() } else { 0.0 };
        Tone { freq, secs, sounding }
    }
}

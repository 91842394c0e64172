// src/model/electron_config.rs

//! Electron configuration notation, e.g. `[Ar] 3d⁶ 4s²` or `1s2 2s2 2p6`.
//!
//! Noble-gas cores are expanded, so the resulting shells always account for
//! every electron of the neutral atom.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Orbital {
    S,
    P,
    D,
    F,
}

impl Orbital {
    fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Orbital::S),
            'p' => Some(Orbital::P),
            'd' => Some(Orbital::D),
            'f' => Some(Orbital::F),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Orbital::S => 's',
            Orbital::P => 'p',
            Orbital::D => 'd',
            Orbital::F => 'f',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subshell {
    pub orbital: Orbital,
    pub electrons: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub number: u8,
    pub subshells: Vec<Subshell>,
    pub total_electrons: u32,
}

/// The diagram never draws more than this many electrons on one ring
pub const MAX_VISIBLE_PER_SHELL: u32 = 8;

impl Shell {
    pub fn visible_electrons(&self) -> u32 {
        self.total_electrons.min(MAX_VISIBLE_PER_SHELL)
    }
}

fn noble_gas_core(symbol: &str) -> Option<&'static str> {
    match symbol {
        "He" => Some("1s²"),
        "Ne" => Some("[He] 2s² 2p⁶"),
        "Ar" => Some("[Ne] 3s² 3p⁶"),
        "Kr" => Some("[Ar] 3d¹⁰ 4s² 4p⁶"),
        "Xe" => Some("[Kr] 4d¹⁰ 5s² 5p⁶"),
        "Rn" => Some("[Xe] 4f¹⁴ 5d¹⁰ 6s² 6p⁶"),
        _ => None,
    }
}

fn digit_value(c: char) -> Option<u32> {
    match c {
        '⁰' => Some(0),
        '¹' => Some(1),
        '²' => Some(2),
        '³' => Some(3),
        '⁴' => Some(4),
        '⁵' => Some(5),
        '⁶' => Some(6),
        '⁷' => Some(7),
        '⁸' => Some(8),
        '⁹' => Some(9),
        c => c.to_digit(10),
    }
}

/// Parses one `<n><orbital><count>` token. Anything else yields None.
fn parse_term(token: &str) -> Option<(u8, Subshell)> {
    let mut chars = token.chars();
    let number = chars.next()?.to_digit(10)? as u8;
    let orbital = Orbital::from_char(chars.next()?)?;

    let mut electrons: Option<u32> = None;
    for c in chars {
        let d = digit_value(c)?;
        electrons = Some(electrons.unwrap_or(0) * 10 + d);
    }

    Some((number, Subshell { orbital, electrons: electrons? }))
}

fn collect_terms(config: &str, out: &mut Vec<(u8, Subshell)>) {
    for token in config.split_whitespace() {
        if let Some(core) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            if let Some(expanded) = noble_gas_core(core) {
                collect_terms(expanded, out);
            } else {
                log::debug!("Unknown core notation [{}] ignored", core);
            }
            continue;
        }
        if let Some(term) = parse_term(token) {
            out.push(term);
        }
    }
}

/// Groups the configuration by principal quantum number, innermost shell first
pub fn parse(config: &str) -> Vec<Shell> {
    let mut terms = Vec::new();
    collect_terms(config, &mut terms);

    let mut shells: Vec<Shell> = Vec::new();
    for (number, subshell) in terms {
        let idx = match shells.iter().position(|s| s.number == number) {
            Some(i) => i,
            None => {
                shells.push(Shell { number, subshells: Vec::new(), total_electrons: 0 });
                shells.len() - 1
            }
        };
        let shell = &mut shells[idx];
        shell.total_electrons += subshell.electrons;
        shell.subshells.push(subshell);
    }

    shells.sort_by_key(|s| s.number);
    shells
}

pub fn total_electrons(shells: &[Shell]) -> u32 {
    shells.iter().map(|s| s.total_electrons).sum()
}

/// "2, 8, 14, 2" style summary used in the detail dialog
pub fn shell_summary(shells: &[Shell]) -> String {
    shells
        .iter()
        .map(|s| s.total_electrons.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iron_expands_argon_core() {
        let shells = parse("[Ar] 3d⁶ 4s²");
        let totals: Vec<u32> = shells.iter().map(|s| s.total_electrons).collect();
        assert_eq!(totals, vec![2, 8, 14, 2]);
        assert_eq!(total_electrons(&shells), 26);
    }

    #[test]
    fn test_multi_digit_superscripts() {
        // 3d¹⁰ is ten electrons, not 1 + 0
        let shells = parse("[Ar] 3d¹⁰ 4s¹");
        assert_eq!(total_electrons(&shells), 29);
        assert_eq!(shell_summary(&shells), "2, 8, 18, 1");
    }

    #[test]
    fn test_ascii_notation() {
        let shells = parse("1s2 2s2 2p6 3s1");
        assert_eq!(total_electrons(&shells), 11);
        assert_eq!(shells[1].subshells.len(), 2);
        assert_eq!(shells[1].subshells[1].orbital, Orbital::P);
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert!(parse("").is_empty());
        assert!(parse("unknown").is_empty());
        let shells = parse("[Zz] 1s²");
        assert_eq!(total_electrons(&shells), 2);
    }

    #[test]
    fn test_visible_electrons_capped() {
        let shells = parse("[Xe] 4f¹⁴ 5d¹⁰ 6s¹");
        let n4 = shells.iter().find(|s| s.number == 4).unwrap();
        assert_eq!(n4.total_electrons, 32);
        assert_eq!(n4.visible_electrons(), MAX_VISIBLE_PER_SHELL);
    }
}

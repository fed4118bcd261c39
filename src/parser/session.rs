use std::sync::LazyLock;

use regex::Regex;

/// Session-type vocabulary. Virtual variants are tried before their
/// plain counterparts so "Teoría Virtual" never matches as "Teoría".
static PATTERNS: LazyLock<[(Regex, SessionKind); 4]> = LazyLock::new(|| {
    let label_re = |phrase: &str| {
        Regex::new(&format!(r"(?i)({})\s+(\d+)(?:\.(\d+))?", phrase)).unwrap()
    };
    [
        (label_re("Teoría Virtual"), SessionKind::TeoriaVirtual),
        (label_re("Laboratorio Virtual"), SessionKind::LaboratorioVirtual),
        (label_re("Teoría"), SessionKind::Teoria),
        (label_re("Laboratorio"), SessionKind::Laboratorio),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    TeoriaVirtual,
    LaboratorioVirtual,
    Teoria,
    Laboratorio,
    Desconocido,
}

impl SessionKind {
    pub fn key_prefix(self) -> &'static str {
        match self {
            SessionKind::TeoriaVirtual => "teoria_virtual",
            SessionKind::LaboratorioVirtual => "laboratorio_virtual",
            SessionKind::Teoria => "teoria",
            SessionKind::Laboratorio => "laboratorio",
            SessionKind::Desconocido => "desconocido",
        }
    }

    pub fn is_virtual(self) -> bool {
        matches!(self, SessionKind::TeoriaVirtual | SessionKind::LaboratorioVirtual)
    }
}

/// A parsed session/group label.
#[derive(Debug, Clone)]
pub struct ParsedLabel {
    pub kind: SessionKind,
    /// The type phrase as it appeared in the label (e.g. "Teoría Virtual").
    pub display: String,
    /// Subsection number selected by the kind's defaulting rule.
    pub numero: String,
}

impl ParsedLabel {
    fn unknown() -> Self {
        ParsedLabel {
            kind: SessionKind::Desconocido,
            display: "Desconocido".to_string(),
            numero: "1".to_string(),
        }
    }
}

/// Parse a free-text session/group label like "Teoría Virtual 1.04".
///
/// Labels carry `<phrase> <number>` with an optional `.<subnumber>`. The
/// number that identifies the subsection depends on the kind:
/// virtual kinds take the subnumber when present (and not "00"), else the
/// primary number; Laboratorio takes the subnumber when present (and not
/// "00"), else "01"; Teoría always takes the primary number. Empty or
/// unrecognized labels map to ("Desconocido", "1").
pub fn parse_label(label: &str) -> ParsedLabel {
    let label = label.trim();
    if label.is_empty() {
        return ParsedLabel::unknown();
    }

    for (re, kind) in PATTERNS.iter() {
        let Some(caps) = re.captures(label) else {
            continue;
        };
        let display = caps[1].to_string();
        let primary = caps[2].to_string();
        let sub = caps.get(3).map(|m| m.as_str()).filter(|s| *s != "00");

        let numero = match kind {
            SessionKind::TeoriaVirtual | SessionKind::LaboratorioVirtual => {
                sub.map(str::to_string).unwrap_or(primary)
            }
            SessionKind::Laboratorio => sub.map(str::to_string).unwrap_or_else(|| "01".to_string()),
            SessionKind::Teoria => primary,
            SessionKind::Desconocido => unreachable!("not in the pattern table"),
        };

        return ParsedLabel {
            kind: *kind,
            display,
            numero,
        };
    }

    ParsedLabel::unknown()
}

/// Normalized option key: type prefix + zero-padded subsection number,
/// e.g. ("Teoría Virtual", "4") → `teoria_virtual_04`.
pub fn option_key(kind: SessionKind, numero: &str) -> String {
    format!("{}_{}", kind.key_prefix(), zero_pad(numero))
}

/// Width-2 zero padding; longer numbers pass through unchanged.
pub fn zero_pad(numero: &str) -> String {
    format!("{:0>2}", numero)
}

/// Strip a trailing bare number from labels with more than two words
/// ("Teoría Virtual 1" → "Teoría Virtual"); two-word labels such as
/// "Teoría 3" keep their number.
pub fn clean_type_label(label: &str) -> String {
    let parts: Vec<&str> = label.split_whitespace().collect();
    if parts.len() > 2 && parts.last().is_some_and(|p| p.chars().all(|c| c.is_ascii_digit())) {
        parts[..parts.len() - 1].join(" ")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(label: &str) -> String {
        let parsed = parse_label(label);
        option_key(parsed.kind, &parsed.numero)
    }

    #[test]
    fn virtual_with_subsection() {
        let parsed = parse_label("Teoría Virtual 1.04");
        assert_eq!(parsed.kind, SessionKind::TeoriaVirtual);
        assert_eq!(parsed.display, "Teoría Virtual");
        assert_eq!(parsed.numero, "04");
        assert_eq!(key("Teoría Virtual 1.04"), "teoria_virtual_04");
    }

    #[test]
    fn virtual_without_subsection_uses_primary() {
        assert_eq!(key("Teoría Virtual 1"), "teoria_virtual_01");
    }

    #[test]
    fn virtual_zero_subsection_uses_primary() {
        assert_eq!(key("Teoría Virtual 2.00"), "teoria_virtual_02");
    }

    #[test]
    fn laboratorio_virtual_has_own_prefix() {
        assert_eq!(key("Laboratorio Virtual 1.03"), "laboratorio_virtual_03");
    }

    #[test]
    fn laboratorio_defaults_to_01() {
        assert_eq!(key("Laboratorio 1.01"), "laboratorio_01");
        assert_eq!(key("Laboratorio 1"), "laboratorio_01");
        assert_eq!(key("Laboratorio 1.02"), "laboratorio_02");
    }

    #[test]
    fn teoria_ignores_subsection() {
        assert_eq!(key("Teoría 3"), "teoria_03");
        assert_eq!(key("Teoría 3.01"), "teoria_03");
    }

    #[test]
    fn empty_and_unrecognized_labels() {
        for label in ["", "   ", "Seminario 2"] {
            let parsed = parse_label(label);
            assert_eq!(parsed.kind, SessionKind::Desconocido);
            assert_eq!(parsed.numero, "1");
            assert_eq!(option_key(parsed.kind, &parsed.numero), "desconocido_01");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let parsed = parse_label("teoría virtual 1.04");
        assert_eq!(parsed.kind, SessionKind::TeoriaVirtual);
        // The display keeps the label's own casing.
        assert_eq!(parsed.display, "teoría virtual");
    }

    #[test]
    fn display_cleanup_strips_trailing_number() {
        assert_eq!(clean_type_label("Teoría Virtual 1"), "Teoría Virtual");
        assert_eq!(clean_type_label("Teoría 3"), "Teoría 3");
        assert_eq!(clean_type_label("Teoría Virtual"), "Teoría Virtual");
        assert_eq!(clean_type_label("Desconocido"), "Desconocido");
    }

    #[test]
    fn zero_padding() {
        assert_eq!(zero_pad("4"), "04");
        assert_eq!(zero_pad("12"), "12");
        assert_eq!(zero_pad("104"), "104");
    }
}

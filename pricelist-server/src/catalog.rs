use shared::types::{ServiceDetails, ServiceSummary};

/// Records the server starts with: (name, price, description)
const SEED: [(&str, u64, &str); 4] = [
    ("Замена стекла", 21_000, "Стекло оригинал от Apple"),
    ("Замена дисплея", 25_000, "Дисплей оригинал от Foxconn"),
    ("Замена аккумулятора", 4_000, "Новый на 4000 mAh"),
    ("Замена микрофона", 2_500, "Оригинальный от Apple"),
];

/// Read-only price list. Built once at startup and shared between handlers.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ServiceDetails>,
}

impl Catalog {
    /// The canonical four-record catalog
    pub fn seeded() -> Self {
        Self::from_seed(SEED)
    }

    /// Build a catalog, assigning ids 1..=n in seed order
    pub fn from_seed<I, N, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, u64, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let records = entries
            .into_iter()
            .zip(1u32..)
            .map(|((name, price, content), id)| ServiceDetails {
                id,
                name: name.into(),
                price,
                content: content.into(),
            })
            .collect();

        Self { records }
    }

    /// All records in insertion order, without descriptions
    pub fn list_all(&self) -> Vec<ServiceSummary> {
        self.records.iter().map(ServiceDetails::summary).collect()
    }

    pub fn get_by_id(&self, id: u32) -> Option<&ServiceDetails> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Route segment to id, with JavaScript `Number()` leniency: surrounding
/// whitespace, a sign, decimal or exponent notation (`1.0`, `1e0`) and
/// `0x`/`0o`/`0b` prefixes are accepted. The value must be a finite whole
/// number that fits `u32`; anything else is `None`.
pub fn parse_id(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u32::from_str_radix(&trimmed[2..], radix).ok();
    }

    // Rust also accepts "inf"/"nan" spellings; both fail the finiteness check
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value as u32)
}

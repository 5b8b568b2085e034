//! Locale-aware fake value generation
//!
//! [`ValueFactory`] is built once per run from the configured locale and
//! optional seed, then handed to target construction. Every generator it
//! creates owns its own RNG, so seeded runs are reproducible per attribute.

use super::replacer::{Replacer, ValueGenerator};
use crate::domain::{HattoriError, Result};
use fake::faker::address::raw::{CityName, StreetName, ZipCode};
use fake::faker::company::raw::CompanyName;
use fake::faker::internet::raw::{FreeEmail, SafeEmail, Username};
use fake::faker::lorem::raw::{Paragraph, Sentence, Word};
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, FR_FR, PT_BR, ZH_CN, ZH_TW};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Supported data locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// English
    #[default]
    En,
    /// French (France)
    FrFr,
    /// Portuguese (Brazil)
    PtBr,
    /// Chinese (Simplified)
    ZhCn,
    /// Chinese (Traditional)
    ZhTw,
}

impl Locale {
    /// All supported locales
    pub const ALL: [Locale; 5] = [
        Locale::En,
        Locale::FrFr,
        Locale::PtBr,
        Locale::ZhCn,
        Locale::ZhTw,
    ];

    /// Canonical code, e.g. `fr_fr`
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::FrFr => "fr_fr",
            Self::PtBr => "pt_br",
            Self::ZhCn => "zh_cn",
            Self::ZhTw => "zh_tw",
        }
    }

    /// Parses a language code such as `en-us`, `fr_FR` or `pt`
    pub fn parse(code: &str) -> Option<Self> {
        let normalized = code.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "en" | "en_us" | "en_gb" => Some(Self::En),
            "fr" | "fr_fr" => Some(Self::FrFr),
            "pt" | "pt_br" => Some(Self::PtBr),
            "zh" | "zh_cn" | "zh_hans" => Some(Self::ZhCn),
            "zh_tw" | "zh_hant" => Some(Self::ZhTw),
            _ => None,
        }
    }

    /// Resolves the configured locale, falling back to English
    pub fn resolve(code: Option<&str>) -> Self {
        match code {
            None => Self::default(),
            Some(code) => Self::parse(code).unwrap_or_else(|| {
                tracing::warn!(
                    locale = code,
                    fallback = Self::default().code(),
                    "Unsupported locale, falling back to default"
                );
                Self::default()
            }),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kinds of generated values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeKind {
    Name,
    FirstName,
    LastName,
    Email,
    SafeEmail,
    FreeEmail,
    Username,
    PhoneNumber,
    StreetName,
    City,
    ZipCode,
    Company,
    Word,
    Sentence,
    Paragraph,
    Digits,
}

impl FakeKind {
    /// All kinds, in display order
    pub const ALL: [FakeKind; 16] = [
        FakeKind::Name,
        FakeKind::FirstName,
        FakeKind::LastName,
        FakeKind::Email,
        FakeKind::SafeEmail,
        FakeKind::FreeEmail,
        FakeKind::Username,
        FakeKind::PhoneNumber,
        FakeKind::StreetName,
        FakeKind::City,
        FakeKind::ZipCode,
        FakeKind::Company,
        FakeKind::Word,
        FakeKind::Sentence,
        FakeKind::Paragraph,
        FakeKind::Digits,
    ];

    /// Configuration name
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::SafeEmail => "safe_email",
            Self::FreeEmail => "free_email",
            Self::Username => "username",
            Self::PhoneNumber => "phone_number",
            Self::StreetName => "street_name",
            Self::City => "city",
            Self::ZipCode => "zip_code",
            Self::Company => "company",
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Digits => "digits",
        }
    }
}

impl fmt::Display for FakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FakeKind {
    type Err = HattoriError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                HattoriError::Configuration(format!(
                    "Unknown faker '{s}'. Run `hattori list-fakers` for the supported kinds"
                ))
            })
    }
}

// Expands a raw faker once per locale, since every locale is its own type.
macro_rules! localized {
    ($locale:expr, $rng:expr, |$l:ident| $faker:expr) => {
        match $locale {
            Locale::En => {
                let $l = EN;
                ($faker).fake_with_rng::<String, _>($rng)
            }
            Locale::FrFr => {
                let $l = FR_FR;
                ($faker).fake_with_rng::<String, _>($rng)
            }
            Locale::PtBr => {
                let $l = PT_BR;
                ($faker).fake_with_rng::<String, _>($rng)
            }
            Locale::ZhCn => {
                let $l = ZH_CN;
                ($faker).fake_with_rng::<String, _>($rng)
            }
            Locale::ZhTw => {
                let $l = ZH_TW;
                ($faker).fake_with_rng::<String, _>($rng)
            }
        }
    };
}

/// Generator backed by the `fake` crate
pub struct FakerGenerator {
    kind: FakeKind,
    locale: Locale,
    rng: Mutex<StdRng>,
}

impl FakerGenerator {
    /// Creates a generator with its own RNG
    pub fn new(kind: FakeKind, locale: Locale, rng: StdRng) -> Self {
        Self {
            kind,
            locale,
            rng: Mutex::new(rng),
        }
    }

    /// Generated kind
    pub fn kind(&self) -> FakeKind {
        self.kind
    }
}

impl ValueGenerator for FakerGenerator {
    fn generate(&self) -> String {
        let mut guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let rng = &mut *guard;

        match self.kind {
            FakeKind::Name => localized!(self.locale, rng, |l| Name(l)),
            FakeKind::FirstName => localized!(self.locale, rng, |l| FirstName(l)),
            FakeKind::LastName => localized!(self.locale, rng, |l| LastName(l)),
            FakeKind::Email | FakeKind::SafeEmail => {
                localized!(self.locale, rng, |l| SafeEmail(l))
            }
            FakeKind::FreeEmail => localized!(self.locale, rng, |l| FreeEmail(l)),
            FakeKind::Username => localized!(self.locale, rng, |l| Username(l)),
            FakeKind::PhoneNumber => localized!(self.locale, rng, |l| PhoneNumber(l)),
            FakeKind::StreetName => localized!(self.locale, rng, |l| StreetName(l)),
            FakeKind::City => localized!(self.locale, rng, |l| CityName(l)),
            FakeKind::ZipCode => localized!(self.locale, rng, |l| ZipCode(l)),
            FakeKind::Company => localized!(self.locale, rng, |l| CompanyName(l)),
            FakeKind::Word => localized!(self.locale, rng, |l| Word(l)),
            FakeKind::Sentence => localized!(self.locale, rng, |l| Sentence(l, 4..10)),
            FakeKind::Paragraph => localized!(self.locale, rng, |l| Paragraph(l, 2..5)),
            FakeKind::Digits => (0..10)
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect(),
        }
    }

    fn describe(&self) -> String {
        format!("faker:{}({})", self.kind, self.locale)
    }
}

/// Builds generators for one run
///
/// # Examples
///
/// ```
/// use hattori::anonymization::faker::{Locale, ValueFactory};
///
/// let factory = ValueFactory::new(Locale::resolve(Some("fr-FR")), Some(7));
/// assert_eq!(factory.locale(), Locale::FrFr);
/// let replacer = factory.replacer("first_name").unwrap();
/// assert_eq!(replacer.describe(), "faker:first_name(fr_fr)");
/// ```
pub struct ValueFactory {
    locale: Locale,
    seed: Option<u64>,
    issued: AtomicU64,
}

impl ValueFactory {
    /// Creates a factory; with a seed every generator is deterministic
    pub fn new(locale: Locale, seed: Option<u64>) -> Self {
        Self {
            locale,
            seed,
            issued: AtomicU64::new(0),
        }
    }

    /// Configured locale
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Creates a generator for a kind
    pub fn generator(&self, kind: FakeKind) -> FakerGenerator {
        let index = self.issued.fetch_add(1, Ordering::Relaxed);
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_entropy(),
        };
        FakerGenerator::new(kind, self.locale, rng)
    }

    /// Resolves a configured faker name into a replacer
    pub fn replacer(&self, faker: &str) -> Result<Replacer> {
        let kind: FakeKind = faker.parse()?;
        Ok(Replacer::generator(self.generator(kind)))
    }
}

impl Default for ValueFactory {
    fn default() -> Self {
        Self::new(Locale::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Some("en"), Locale::En ; "english")]
    #[test_case(Some("en-US"), Locale::En ; "english region")]
    #[test_case(Some("fr_FR"), Locale::FrFr ; "french")]
    #[test_case(Some("pt"), Locale::PtBr ; "bare portuguese")]
    #[test_case(Some("zh-tw"), Locale::ZhTw ; "traditional chinese")]
    #[test_case(Some("tlh"), Locale::En ; "unknown falls back")]
    #[test_case(None, Locale::En ; "missing falls back")]
    fn test_locale_resolve(code: Option<&str>, expected: Locale) {
        assert_eq!(Locale::resolve(code), expected);
    }

    #[test]
    fn test_fake_kind_round_trips_names() {
        for kind in FakeKind::ALL {
            assert_eq!(kind.name().parse::<FakeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_fake_kind() {
        let err = "favourite_colour".parse::<FakeKind>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_every_kind_generates() {
        let factory = ValueFactory::new(Locale::En, Some(1));
        for kind in FakeKind::ALL {
            let value = factory.generator(kind).generate();
            assert!(!value.is_empty(), "{kind} produced nothing");
        }
    }

    #[test]
    fn test_names_generate_for_every_locale() {
        for locale in Locale::ALL {
            let factory = ValueFactory::new(locale, Some(1));
            let value = factory.generator(FakeKind::Name).generate();
            assert!(!value.is_empty(), "name in {locale} produced nothing");
        }
    }

    #[test]
    fn test_seeded_factories_agree() {
        let a = ValueFactory::new(Locale::En, Some(42));
        let b = ValueFactory::new(Locale::En, Some(42));
        let gen_a = a.generator(FakeKind::Name);
        let gen_b = b.generator(FakeKind::Name);
        for _ in 0..5 {
            assert_eq!(gen_a.generate(), gen_b.generate());
        }
    }

    #[test]
    fn test_digits() {
        let factory = ValueFactory::new(Locale::En, Some(3));
        let value = factory.generator(FakeKind::Digits).generate();
        assert_eq!(value.len(), 10);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_email_contains_at() {
        let factory = ValueFactory::default();
        let value = factory.generator(FakeKind::Email).generate();
        assert!(value.contains('@'));
    }
}

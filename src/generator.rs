use std::collections::HashSet;
use std::ops::Range;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::error::GenerateError;
use crate::models::{
    DocumentType, TransactionRecord, TransactionReason, TransactionType, WithdrawalExtra,
    WithdrawalMethod,
};

pub const DEFAULT_RECORD_COUNT: usize = 1000;

/// How far back creation dates may reach
pub const HISTORY_DAYS: i64 = 365;

/// Draws allowed per unique value before giving up
pub const DEFAULT_UNIQUE_ATTEMPTS: usize = 1000;

pub const DOCUMENT_NUMBER_PATTERN: &str = "???######???";

const CURRENCY: &str = "MXN";
const PAYMENT_METHOD_TYPE: &str = "bank_account";

const FIRST_NAMES: [&str; 20] = [
    "María", "José", "Guadalupe", "Juan", "Fernanda", "Luis", "Ximena", "Carlos", "Daniela",
    "Jorge", "Valeria", "Miguel", "Sofía", "Alejandro", "Regina", "Ricardo", "Camila", "Eduardo",
    "Paola", "Arturo",
];

const LAST_NAMES: [&str; 20] = [
    "Hernández", "García", "Martínez", "López", "González", "Pérez", "Rodríguez", "Sánchez",
    "Ramírez", "Cruz", "Flores", "Gómez", "Morales", "Vázquez", "Reyes", "Jiménez", "Torres",
    "Díaz", "Gutiérrez", "Ruiz",
];

const COMPANY_SUFFIXES: [&str; 4] = ["S.A. de C.V.", "S.C.", "S.A.", "S. de R.L."];

/// Amount bucket with its selection weight out of ten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTier {
    Low,
    Mid,
    High,
}

impl AmountTier {
    /// 50% low, 40% mid, 10% high
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..10u8) {
            0..=4 => Self::Low,
            5..=8 => Self::Mid,
            _ => Self::High,
        }
    }

    /// Half-open bounds in whole currency units
    pub fn bounds(&self) -> (Decimal, Decimal) {
        let cents = self.cents();
        (Decimal::new(cents.start, 2), Decimal::new(cents.end, 2))
    }

    fn cents(&self) -> Range<i64> {
        match self {
            Self::Low => 5_000..100_000,
            Self::Mid => 100_000..500_000,
            Self::High => 500_000..1_000_000,
        }
    }

    /// Bucket an amount falls into, if any
    pub fn of(amount: Decimal) -> Option<Self> {
        [Self::Low, Self::Mid, Self::High].into_iter().find(|tier| {
            let (lo, hi) = tier.bounds();
            amount >= lo && amount < hi
        })
    }
}

/// Weighted amount with two decimal places
pub fn generate_amount<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    let tier = AmountTier::draw(rng);
    Decimal::new(rng.random_range(tier.cents()), 2)
}

/// Replace `?` with an uppercase letter and `#` with a digit
pub fn bothify<R: Rng + ?Sized>(rng: &mut R, pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '?' => char::from(rng.random_range(b'A'..=b'Z')),
            '#' => char::from(rng.random_range(b'0'..=b'9')),
            other => other,
        })
        .collect()
}

/// Hands out values that were never handed out before
#[derive(Debug)]
pub struct UniquePool {
    issued: HashSet<String>,
    max_attempts: usize,
}

impl UniquePool {
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_UNIQUE_ATTEMPTS)
    }

    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            issued: HashSet::new(),
            max_attempts,
        }
    }

    /// Draw from `pattern` until an unseen value comes up
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pattern: &str,
    ) -> Result<String, GenerateError> {
        for _ in 0..self.max_attempts {
            let candidate = bothify(rng, pattern);
            if self.issued.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(GenerateError::UniquenessExhausted {
            pattern: pattern.to_string(),
            attempts: self.max_attempts,
        })
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

impl Default for UniquePool {
    fn default() -> Self {
        Self::new()
    }
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

fn person_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(rng, &FIRST_NAMES),
        pick(rng, &LAST_NAMES),
        pick(rng, &LAST_NAMES)
    )
}

fn company_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.random_range(0..3u8) {
        0 => format!("Grupo {}", pick(rng, &LAST_NAMES)),
        1 => format!(
            "{} y {} {}",
            pick(rng, &LAST_NAMES),
            pick(rng, &LAST_NAMES),
            pick(rng, &COMPANY_SUFFIXES)
        ),
        _ => format!("{} {}", pick(rng, &LAST_NAMES), pick(rng, &COMPANY_SUFFIXES)),
    }
}

/// Synthetic record generator bound to one RNG and one reference time
pub struct RecordGenerator<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    now: DateTime<Utc>,
    document_numbers: UniquePool,
}

impl<'a, R: Rng + ?Sized> RecordGenerator<'a, R> {
    pub fn new(rng: &'a mut R, now: DateTime<Utc>) -> Self {
        Self::with_pool(rng, now, UniquePool::new())
    }

    pub fn with_pool(rng: &'a mut R, now: DateTime<Utc>, document_numbers: UniquePool) -> Self {
        Self {
            rng,
            now: now.trunc_subsecs(0),
            document_numbers,
        }
    }

    /// Produce one record
    pub fn next_record(&mut self) -> Result<TransactionRecord, GenerateError> {
        let rng = &mut *self.rng;

        let created = self.now - Duration::seconds(rng.random_range(0..=HISTORY_DAYS * 86_400));
        let updated = created + Duration::minutes(rng.random_range(1..=60));
        let withdrawal_created = created - Duration::days(rng.random_range(1..=5));

        let document_number = self.document_numbers.draw(rng, DOCUMENT_NUMBER_PATTERN)?;

        Ok(TransactionRecord {
            id: random_uuid(rng),
            created_date: created,
            last_updated_date: updated,
            chargeback_date: None,
            tx_type: *pick(rng, &TransactionType::ALL),
            reason: *pick(rng, &TransactionReason::ALL),
            amount: generate_amount(rng),
            currency: CURRENCY.to_string(),
            payment_request: random_uuid(rng),
            payment_request_reference: format!("INV-2025-{}", rng.random_range(100..=999)),
            payment_request_display_reference: format!("Payment to {}", company_name(rng)),
            customer_name: person_name(rng),
            customer_document_type: *pick(rng, &DocumentType::ALL),
            customer_document_number: document_number,
            payment_method_type: PAYMENT_METHOD_TYPE.to_string(),
            account_number: bothify(rng, "##################"),
            withdrawal_id: random_uuid(rng),
            withdrawal_created_date: withdrawal_created,
            withdrawal_extra: WithdrawalExtra {
                reference_id: bothify(rng, "???###"),
                withdrawal_method: *pick(rng, &WithdrawalMethod::ALL),
            },
        })
    }
}

/// Generate `count` independent records created within the year before `now`
pub fn generate_records<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
) -> Result<Vec<TransactionRecord>, GenerateError> {
    let mut generator = RecordGenerator::new(rng, now);
    let records = (0..count)
        .map(|_| generator.next_record())
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = records.len(), "generated synthetic records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bothify_pattern() {
        let mut rng = StdRng::seed_from_u64(7);
        let value = bothify(&mut rng, "??-##x");
        let chars: Vec<char> = value.chars().collect();
        assert_eq!(chars.len(), 6);
        assert!(chars[0].is_ascii_uppercase() && chars[1].is_ascii_uppercase());
        assert_eq!(chars[2], '-');
        assert!(chars[3].is_ascii_digit() && chars[4].is_ascii_digit());
        assert_eq!(chars[5], 'x');
    }

    #[test]
    fn test_tier_bounds() {
        assert_eq!(AmountTier::of(Decimal::new(5000, 2)), Some(AmountTier::Low));
        assert_eq!(AmountTier::of(Decimal::new(99999, 2)), Some(AmountTier::Low));
        assert_eq!(AmountTier::of(Decimal::new(1000, 0)), Some(AmountTier::Mid));
        assert_eq!(AmountTier::of(Decimal::new(999999, 2)), Some(AmountTier::High));
        assert_eq!(AmountTier::of(Decimal::new(10000, 0)), None);
        assert_eq!(AmountTier::of(Decimal::new(4999, 2)), None);
    }

    #[test]
    fn test_pool_exhaustion_is_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = UniquePool::new();
        for _ in 0..10 {
            pool.draw(&mut rng, "#").unwrap();
        }
        assert_eq!(pool.len(), 10);
        let err = pool.draw(&mut rng, "#").unwrap_err();
        assert!(matches!(
            err,
            GenerateError::UniquenessExhausted { attempts: 1000, .. }
        ));
    }
}

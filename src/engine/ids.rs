use std::collections::HashSet;

use rand::Rng;

pub const ID_DIGITS: usize = 10;

/// `<prefix>-` followed by `ID_DIGITS` random decimal digits.
pub fn random_id<R: Rng>(prefix: &str, rng: &mut R) -> String {
    let digits: String = (0..ID_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{prefix}-{digits}")
}

/// Issues random ids and redraws whenever a value was already handed out.
#[derive(Debug, Default)]
pub struct IdGenerator {
    issued: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, prefix: &str) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = random_id(prefix, &mut rng);
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

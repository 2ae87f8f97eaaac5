use super::*;

/// Draws each code position independently and uniformly from the answer
/// symbols. Repeated symbols are allowed, same as rolling a die per position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomSecretGenerator {
    seed: u64,
}

impl RandomSecretGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl SecretGenerator for RandomSecretGenerator {
    fn generate(self) -> SecretCode {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut symbols = [Symbol::None; CODE_LENGTH];
        for slot in symbols.iter_mut() {
            *slot = Symbol::ANSWERS[rng.random_range(0..Symbol::ANSWERS.len())];
        }

        let code = SecretCode::from_symbols(symbols);
        log::debug!("door code is {:?}", code.symbols());
        code
    }
}

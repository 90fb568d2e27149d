use std::fmt;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::assets::AssetsLoader;
use crate::errors::GenerationError;

pub const GIVEN_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Barbara", "David", "Elizabeth", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Christopher", "Karen", "Daniel", "Nancy", "Matthew", "Lisa", "Anthony", "Betty", "Mark",
    "Margaret", "Donald", "Sandra", "Steven", "Ashley", "Paul", "Kimberly", "Andrew", "Emily",
    "Joshua", "Donna", "Kenneth", "Michelle", "Christina", "George", "Laura", "Kevin", "Carol",
    "Brian", "Amanda", "Edward",
];

pub const FAMILY_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall",
    "Rivera", "Campbell", "Mitchell", "Carter", "Roberts", "Vargas", "Harper", "Newman", "Blake",
    "Walters",
];

pub const COUNTRIES: &[&str] = &[
    "US", "UK", "CA", "AU", "DE", "FR", "IT", "ES", "NL", "SE", "NO", "DK", "FI", "IE", "NZ", "CH",
    "AT", "BE", "PT", "GR", "PL", "CZ", "HU", "RO", "BG", "HR", "SI", "SK", "LT", "LV", "EE", "JP",
    "KR", "CN", "IN", "SG", "MY", "TH", "PH", "ID", "VN", "BR", "MX", "AR", "CL", "CO", "PE", "VE",
    "ZA", "EG",
];

pub const PROGRAMS: &[&str] = &[
    "OFAC SDN",
    "EU Sanctions",
    "UN Sanctions",
    "DFAT Sanctions",
    "HMT Sanctions",
    "SECO Sanctions",
    "FINMA Watchlist",
    "PEP List",
];

/// One of the fixed universes attributes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    GivenNames,
    FamilyNames,
    Countries,
    Programs,
}

impl PoolKind {
    pub const ALL: [PoolKind; 4] = [
        PoolKind::GivenNames,
        PoolKind::FamilyNames,
        PoolKind::Countries,
        PoolKind::Programs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PoolKind::GivenNames => "given_names",
            PoolKind::FamilyNames => "family_names",
            PoolKind::Countries => "countries",
            PoolKind::Programs => "programs",
        }
    }

    /// Override file looked up in an assets directory.
    pub fn asset_file(self) -> &'static str {
        match self {
            PoolKind::GivenNames => "given_names.txt",
            PoolKind::FamilyNames => "family_names.txt",
            PoolKind::Countries => "countries.txt",
            PoolKind::Programs => "programs.txt",
        }
    }

    /// Names compose as "<given> <family>", so each part must be one token.
    fn accepts(self, value: &str) -> bool {
        match self {
            PoolKind::GivenNames | PoolKind::FamilyNames => {
                !value.chars().any(char::is_whitespace)
            }
            PoolKind::Countries => is_country_code(value),
            PoolKind::Programs => true,
        }
    }

    fn expected_format(self) -> &'static str {
        match self {
            PoolKind::GivenNames | PoolKind::FamilyNames => "a single name without whitespace",
            PoolKind::Countries => "a 2-letter uppercase country code",
            PoolKind::Programs => "a program label",
        }
    }

    fn builtin(self) -> &'static [&'static str] {
        match self {
            PoolKind::GivenNames => GIVEN_NAMES,
            PoolKind::FamilyNames => FAMILY_NAMES,
            PoolKind::Countries => COUNTRIES,
            PoolKind::Programs => PROGRAMS,
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable attribute universes. Sampling is uniform with replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePools {
    given_names: Vec<String>,
    family_names: Vec<String>,
    countries: Vec<String>,
    programs: Vec<String>,
}

impl Default for AttributePools {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AttributePools {
    pub fn builtin() -> Self {
        let owned = |kind: PoolKind| -> Vec<String> {
            kind.builtin().iter().map(|value| value.to_string()).collect()
        };
        Self {
            given_names: owned(PoolKind::GivenNames),
            family_names: owned(PoolKind::FamilyNames),
            countries: owned(PoolKind::Countries),
            programs: owned(PoolKind::Programs),
        }
    }

    /// Build pools from explicit lists. Emptiness is not checked here; see
    /// [`AttributePools::validate`].
    pub fn new(
        given_names: Vec<String>,
        family_names: Vec<String>,
        countries: Vec<String>,
        programs: Vec<String>,
    ) -> Self {
        Self {
            given_names,
            family_names,
            countries,
            programs,
        }
    }

    /// Built-in pools with any universe replaced by `<dir>/<pool>.txt` when
    /// that file exists.
    pub fn from_assets(dir: &Path) -> Result<Self, GenerationError> {
        let loader = AssetsLoader::new(dir);
        let mut pools = Self::builtin();
        for kind in PoolKind::ALL {
            let Some(values) = loader.load_lines(kind.asset_file())? else {
                continue;
            };
            if let Some(bad) = values.iter().find(|value| !kind.accepts(value)) {
                return Err(GenerationError::Asset(format!(
                    "{}: '{}' is not {}",
                    loader.root().join(kind.asset_file()).display(),
                    bad,
                    kind.expected_format()
                )));
            }
            debug!(pool = %kind, values = values.len(), "pool overridden from assets");
            *pools.values_mut(kind) = values;
        }
        pools.validate()?;
        Ok(pools)
    }

    pub fn values(&self, kind: PoolKind) -> &[String] {
        match kind {
            PoolKind::GivenNames => &self.given_names,
            PoolKind::FamilyNames => &self.family_names,
            PoolKind::Countries => &self.countries,
            PoolKind::Programs => &self.programs,
        }
    }

    fn values_mut(&mut self, kind: PoolKind) -> &mut Vec<String> {
        match kind {
            PoolKind::GivenNames => &mut self.given_names,
            PoolKind::FamilyNames => &mut self.family_names,
            PoolKind::Countries => &mut self.countries,
            PoolKind::Programs => &mut self.programs,
        }
    }

    pub fn len(&self, kind: PoolKind) -> usize {
        self.values(kind).len()
    }

    pub fn contains(&self, kind: PoolKind, value: &str) -> bool {
        self.values(kind).iter().any(|candidate| candidate == value)
    }

    /// Fails on the first empty universe.
    pub fn validate(&self) -> Result<(), GenerationError> {
        for kind in PoolKind::ALL {
            if self.values(kind).is_empty() {
                return Err(GenerationError::EmptyPool { pool: kind.name() });
            }
        }
        Ok(())
    }

    /// Draw one value uniformly at random.
    pub fn draw<'a, R: Rng + ?Sized>(
        &'a self,
        kind: PoolKind,
        rng: &mut R,
    ) -> Result<&'a str, GenerationError> {
        self.values(kind)
            .choose(rng)
            .map(String::as_str)
            .ok_or(GenerationError::EmptyPool { pool: kind.name() })
    }

    /// "<given> <family>", each part drawn independently.
    pub fn full_name<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, GenerationError> {
        let given = self.draw(PoolKind::GivenNames, rng)?;
        let family = self.draw(PoolKind::FamilyNames, rng)?;
        Ok(format!("{given} {family}"))
    }
}

fn is_country_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|byte| byte.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn builtin_pool_sizes() {
        let pools = AttributePools::builtin();
        assert_eq!(pools.len(PoolKind::GivenNames), 48);
        assert_eq!(pools.len(PoolKind::FamilyNames), 55);
        assert_eq!(pools.len(PoolKind::Countries), 50);
        assert_eq!(pools.len(PoolKind::Programs), 8);
        assert!(pools.validate().is_ok());
    }

    #[test]
    fn builtin_countries_are_two_uppercase_letters() {
        assert!(COUNTRIES.iter().all(|code| is_country_code(code)));
    }

    #[test]
    fn draw_stays_in_pool() {
        let pools = AttributePools::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let country = pools.draw(PoolKind::Countries, &mut rng).expect("draw");
            assert!(COUNTRIES.contains(&country));
        }
    }

    #[test]
    fn draw_reaches_every_program() {
        let pools = AttributePools::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(pools.draw(PoolKind::Programs, &mut rng).expect("draw"));
        }
        assert_eq!(seen.len(), PROGRAMS.len());
    }

    #[test]
    fn empty_pool_is_a_precondition_failure() {
        let pools = AttributePools::new(
            vec!["Ada".to_string()],
            vec!["Lovelace".to_string()],
            vec!["UK".to_string()],
            Vec::new(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(matches!(
            pools.validate(),
            Err(GenerationError::EmptyPool { pool: "programs" })
        ));
        assert!(matches!(
            pools.draw(PoolKind::Programs, &mut rng),
            Err(GenerationError::EmptyPool { pool: "programs" })
        ));
        assert_eq!(pools.full_name(&mut rng).expect("name"), "Ada Lovelace");
    }

    #[test]
    fn assets_override_only_present_files() {
        let dir =
            std::env::temp_dir().join(format!("matchforge_pools_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(dir.join("countries.txt"), "AU\nNZ\n").expect("write countries");

        let pools = AttributePools::from_assets(&dir).expect("load pools");
        assert_eq!(pools.values(PoolKind::Countries), ["AU", "NZ"]);
        assert_eq!(pools.len(PoolKind::GivenNames), GIVEN_NAMES.len());
    }

    #[test]
    fn assets_reject_malformed_country() {
        let dir =
            std::env::temp_dir().join(format!("matchforge_pools_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(dir.join("countries.txt"), "AU\nnz\n").expect("write countries");

        let err = AttributePools::from_assets(&dir).unwrap_err();
        assert!(matches!(err, GenerationError::Asset(_)));
    }

    #[test]
    fn assets_reject_multi_token_names() {
        for file in ["given_names.txt", "family_names.txt"] {
            let dir =
                std::env::temp_dir().join(format!("matchforge_pools_{}", uuid::Uuid::new_v4()));
            fs::create_dir_all(&dir).expect("create dir");
            fs::write(dir.join(file), "Mary\nMary Ann\n").expect("write names");

            let err = AttributePools::from_assets(&dir).unwrap_err();
            assert!(matches!(err, GenerationError::Asset(_)), "{file} accepted");
        }
    }

    #[test]
    fn builtin_names_are_single_tokens() {
        for kind in [PoolKind::GivenNames, PoolKind::FamilyNames] {
            assert!(kind.builtin().iter().all(|name| kind.accepts(name)));
        }
    }

    #[test]
    fn assets_reject_empty_override() {
        let dir =
            std::env::temp_dir().join(format!("matchforge_pools_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create dir");
        fs::write(dir.join("given_names.txt"), "\n\n").expect("write names");

        let err = AttributePools::from_assets(&dir).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::EmptyPool {
                pool: "given_names"
            }
        ));
    }
}

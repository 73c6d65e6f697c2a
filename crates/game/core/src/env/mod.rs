//! Traits describing read-only host data.
//!
//! Oracles expose the host's form registry and a random source; [`ActorView`]
//! exposes one actor at the moment of a lookup. The [`Env`] aggregate bundles
//! the oracles so the evaluator and engine never reach for ambient globals.
mod actor;
mod error;
mod forms;
mod rng;
mod snapshot;

pub use actor::ActorView;
pub use error::OracleError;
pub use forms::FormOracle;
pub use rng::{PcgRng, RngOracle};
pub use snapshot::{ActorSnapshot, FormRecord, FormsSnapshot};

/// Aggregates the read-only oracles required by the resolution engine.
pub struct Env<'a, F, R>
where
    F: FormOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    forms: Option<&'a F>,
    rng: Option<&'a R>,
}

// Manual impls: derive would require `F: Clone`, which trait objects lack.
impl<F, R> Clone for Env<'_, F, R>
where
    F: FormOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<F, R> Copy for Env<'_, F, R>
where
    F: FormOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type SwapEnv<'a> = Env<'a, dyn FormOracle + 'a, dyn RngOracle + 'a>;

impl<'a, F, R> Env<'a, F, R>
where
    F: FormOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(forms: Option<&'a F>, rng: Option<&'a R>) -> Self {
        Self { forms, rng }
    }

    pub fn with_all(forms: &'a F, rng: &'a R) -> Self {
        Self::new(Some(forms), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            forms: None,
            rng: None,
        }
    }

    /// Returns the FormOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::FormsNotAvailable` if no form oracle was provided.
    pub fn forms(&self) -> Result<&'a F, OracleError> {
        self.forms.ok_or(OracleError::FormsNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, F, R> Env<'a, F, R>
where
    F: FormOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `SwapEnv`.
    pub fn as_swap_env(&self) -> SwapEnv<'a> {
        let forms: Option<&'a dyn FormOracle> = self.forms.map(|forms| forms as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(forms, rng)
    }
}

use core::marker::PhantomData;

#[cfg(feature = "async-tokio")]
use tokio_util::sync::CancellationToken;
#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(feature = "async-tokio")]
use crate::futures::IdGeneratorAsyncExt;
use crate::{
    code::CodeOptions,
    error::{Error, Result},
    generator::{BackoffPolicy, IdGenerator},
    id::{Snowflake, SnowflakeId},
    resource::{ResourceId, ResourceTag},
};

/// Mints resource identifiers: a numeric ID from the generator, encoded
/// into a short code and prefixed with a tag.
///
/// The generator is the only mutable state; a `Minter` can be shared across
/// threads or tasks (e.g. behind an `Arc`) whenever its generator can.
///
/// [`Minter::with_defaults`] encodes with [`CodeOptions::resource`], giving
/// six lowercase letters and digits after the tag. Use [`Minter::new`] to
/// supply other options, typically built from
/// [`CodeOptions::resource_builder`].
///
/// Unlike [`IdGenerator::next_id_blocking`] and the async `next_id`, which
/// hand out [`SENTINEL_ID`] once the generator failed its startup clock
/// check, minting refuses with [`Error::GeneratorUnavailable`] so that no
/// caller ever stores the code of the sentinel as a real identifier.
///
/// ```
/// use ridgen::{
///     BackoffPolicy, CodeOptions, GeneratorConfig, LockGenerator, Minter, ResourceTag,
///     SnowflakeId, SystemClock,
/// };
///
/// let generator = LockGenerator::new(GeneratorConfig::<SnowflakeId>::new(7).unwrap(), SystemClock);
/// let minter = Minter::with_defaults(generator, BackoffPolicy::default());
/// assert_eq!(
///     minter.format(&ResourceTag::USER, 123_456_789).as_str(),
///     "mu-g5pwwe"
/// );
///
/// let generator = LockGenerator::new(GeneratorConfig::<SnowflakeId>::new(7).unwrap(), SystemClock);
/// let minter = Minter::new(generator, CodeOptions::default(), BackoffPolicy::default());
/// assert_eq!(
///     minter.format(&ResourceTag::USER, 123_456_789).as_str(),
///     "mu-E3ES33HS"
/// );
/// ```
///
/// [`SENTINEL_ID`]: crate::SENTINEL_ID
pub struct Minter<G, ID = SnowflakeId>
where
    G: IdGenerator<ID>,
    ID: Snowflake,
{
    generator: G,
    options: CodeOptions,
    policy: BackoffPolicy,
    _id: PhantomData<fn() -> ID>,
}

impl<G, ID> Minter<G, ID>
where
    G: IdGenerator<ID>,
    ID: Snowflake,
{
    /// Creates a minter encoding with `options`.
    pub fn new(generator: G, options: CodeOptions, policy: BackoffPolicy) -> Self {
        Self {
            generator,
            options,
            policy,
            _id: PhantomData,
        }
    }

    /// Creates a minter encoding with [`CodeOptions::resource`].
    pub fn with_defaults(generator: G, policy: BackoffPolicy) -> Self {
        Self::new(generator, CodeOptions::resource(), policy)
    }

    /// The underlying numeric generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The short-code options.
    pub fn options(&self) -> &CodeOptions {
        &self.options
    }

    /// The backoff policy applied while the generator is pending.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Formats an already generated numeric ID. Deterministic.
    pub fn format(&self, tag: &ResourceTag, numeric_id: u64) -> ResourceId {
        ResourceId::from_parts(tag.as_str(), &self.options.encode(numeric_id))
    }

    /// Mints a new identifier, sleeping on the calling thread while the
    /// generator is pending.
    ///
    /// # Errors
    ///
    /// - [`Error::GeneratorUnavailable`] if the generator is broken
    /// - Any error from [`IdGenerator::next_id_blocking`]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(tag = %tag)))]
    pub fn mint_blocking(&self, tag: &ResourceTag) -> Result<ResourceId> {
        self.ensure_available()?;
        let id = self.generator.next_id_blocking(&self.policy)?;
        Ok(self.format(tag, id))
    }

    fn ensure_available(&self) -> Result<()> {
        if self.generator.is_broken() {
            return Err(Error::GeneratorUnavailable);
        }
        Ok(())
    }
}

#[cfg(feature = "async-tokio")]
impl<G, ID> Minter<G, ID>
where
    G: IdGenerator<ID> + Sync,
    ID: Snowflake + Send,
{
    /// Mints a new identifier, waiting asynchronously while the generator is
    /// pending. The wait stops as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// - [`Error::GeneratorUnavailable`] if the generator is broken
    /// - [`Error::Cancelled`] if `cancel` fires before an ID is available
    /// - Any other error from [`IdGeneratorAsyncExt::next_id`]
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(tag = %tag)))]
    pub async fn mint(&self, tag: &ResourceTag, cancel: &CancellationToken) -> Result<ResourceId> {
        self.ensure_available()?;
        let id = self.generator.next_id(&self.policy, cancel).await?;
        Ok(self.format(tag, id))
    }
}

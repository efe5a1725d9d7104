use core::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use ridgen::{
    BackoffPolicy, CodeOptions, DEFAULT_EPOCH, GeneratorConfig, ResourceTag, Snowflake,
    WideMachineId,
};

/// Numeric layout used by the binary: 16-bit machine IDs so every instance
/// in a fleet can be addressed directly.
pub type IdLayout = WideMachineId;

/// Runtime configuration for the `ridgen` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file in the working directory is honoured). The code parameters
/// must match whatever produced previously issued identifiers, otherwise new
/// codes may collide with old ones.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ridgen",
    version,
    about = "Mint collision-resistant resource identifiers"
)]
pub struct CliArgs {
    /// Machine ID of this instance. Must be unique across every instance
    /// minting identifiers with the same epoch.
    ///
    /// Environment variable: `MACHINE_ID`
    #[arg(long, env = "MACHINE_ID")]
    pub machine_id: u64,

    /// Generator epoch in milliseconds since the Unix epoch.
    ///
    /// Environment variable: `ID_EPOCH_MS`
    #[arg(long, env = "ID_EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Ordered, distinct symbols used for the short code.
    ///
    /// Environment variable: `CODE_ALPHABET`
    #[arg(long, env = "CODE_ALPHABET", default_value_t = String::from(CodeOptions::RESOURCE_ALPHABET))]
    pub alphabet: String,

    /// Scaling multiplier. Must be coprime with the alphabet size.
    ///
    /// Environment variable: `CODE_N1`
    #[arg(long, env = "CODE_N1", default_value_t = CodeOptions::DEFAULT_N1)]
    pub n1: u64,

    /// Permutation multiplier. Must be coprime with the code length.
    ///
    /// Environment variable: `CODE_N2`
    #[arg(long, env = "CODE_N2", default_value_t = CodeOptions::DEFAULT_N2)]
    pub n2: u64,

    /// Number of symbols in each code.
    ///
    /// Environment variable: `CODE_LENGTH`
    #[arg(long, env = "CODE_LENGTH", default_value_t = CodeOptions::RESOURCE_LENGTH)]
    pub length: usize,

    /// Additive salt applied before encoding.
    ///
    /// Environment variable: `CODE_SALT`
    #[arg(long, env = "CODE_SALT", default_value_t = CodeOptions::DEFAULT_SALT)]
    pub salt: u64,

    /// Accept `n1`/`n2` values that share a factor with the alphabet size or
    /// code length. Only for compatibility with codes issued that way.
    ///
    /// Environment variable: `ALLOW_NON_COPRIME`
    #[arg(long, env = "ALLOW_NON_COPRIME", default_value_t = false)]
    pub allow_non_coprime: bool,

    /// Resource tag prefixed to every identifier.
    ///
    /// Environment variable: `RESOURCE_TAG`
    #[arg(short, long, env = "RESOURCE_TAG", default_value_t = String::from("mu"))]
    pub tag: String,

    /// Number of identifiers to mint.
    ///
    /// Environment variable: `MINT_COUNT`
    #[arg(short = 'n', long, env = "MINT_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Retries allowed per identifier while the generator is pending.
    ///
    /// Environment variable: `BACKOFF_MAX_ATTEMPTS`
    #[arg(long, env = "BACKOFF_MAX_ATTEMPTS", default_value_t = BackoffPolicy::DEFAULT_MAX_ATTEMPTS)]
    pub backoff_max_attempts: u32,

    /// Time budget per identifier, in milliseconds, while the generator is
    /// pending.
    ///
    /// Environment variable: `BACKOFF_MAX_ELAPSED_MS`
    #[arg(long, env = "BACKOFF_MAX_ELAPSED_MS", default_value_t = BackoffPolicy::DEFAULT_MAX_ELAPSED.as_millis() as u64)]
    pub backoff_max_elapsed_ms: u64,

    /// Overall deadline for the whole run, in milliseconds.
    ///
    /// Environment variable: `MINT_DEADLINE_MS`
    #[arg(long, env = "MINT_DEADLINE_MS")]
    pub deadline_ms: Option<u64>,

    /// Emit logs as JSON.
    ///
    /// Environment variable: `LOG_JSON`
    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct MintConfig {
    pub generator: GeneratorConfig<IdLayout>,
    pub options: CodeOptions,
    pub tag: ResourceTag,
    pub count: usize,
    pub policy: BackoffPolicy,
    pub deadline: Option<Duration>,
    pub json: bool,
}

impl TryFrom<CliArgs> for MintConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let generator = GeneratorConfig::<IdLayout>::new(args.machine_id)
            .with_context(|| {
                format!(
                    "MACHINE_ID must be within 1..={}",
                    IdLayout::max_machine_id()
                )
            })?
            .with_epoch(Duration::from_millis(args.epoch_ms));

        let options = CodeOptions::builder()
            .alphabet(&args.alphabet)
            .n1(args.n1)
            .n2(args.n2)
            .length(args.length)
            .salt(args.salt)
            .allow_non_coprime(args.allow_non_coprime)
            .build()
            .context("invalid short-code options")?;

        let tag = ResourceTag::new(args.tag).context("invalid RESOURCE_TAG")?;

        if args.count == 0 {
            bail!("MINT_COUNT must be greater than 0");
        }

        if args.backoff_max_elapsed_ms == 0 {
            bail!("BACKOFF_MAX_ELAPSED_MS must be greater than 0");
        }

        let policy = BackoffPolicy::default()
            .with_max_attempts(args.backoff_max_attempts)
            .with_max_elapsed(Duration::from_millis(args.backoff_max_elapsed_ms));

        Ok(Self {
            generator,
            options,
            tag,
            count: args.count,
            policy,
            deadline: args.deadline_ms.map(Duration::from_millis),
            json: args.json,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use ridgen::{CodeError, Error};

    use super::*;

    fn parse(extra: &[&str]) -> anyhow::Result<MintConfig> {
        let args = CliArgs::try_parse_from(
            ["ridgen", "--machine-id", "7"].iter().chain(extra.iter()),
        )?;
        MintConfig::try_from(args)
    }

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn defaults_use_resource_preset() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.generator.machine_id(), 7);
        assert_eq!(config.generator.epoch(), DEFAULT_EPOCH);
        assert_eq!(config.options, CodeOptions::resource());
        assert_eq!(config.options.encode(123_456_789), "g5pwwe");
        assert_eq!(config.tag, ResourceTag::USER);
        assert_eq!(config.count, 1);
        assert_eq!(config.policy, BackoffPolicy::default());
        assert_eq!(config.deadline, None);
        assert!(!config.json);
    }

    #[test]
    fn overrides_are_applied() {
        let config = parse(&[
            "--epoch-ms",
            "0",
            "--alphabet",
            "23456789ABCDEFGHJKLMNPQRSTVWXY",
            "--length",
            "8",
            "--tag",
            "org",
            "-n",
            "3",
            "--deadline-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(config.generator.epoch_millis(), 0);
        assert_eq!(config.options.encode(123_456_789), "E3ES33HS");
        assert_eq!(config.tag.as_str(), "org");
        assert_eq!(config.count, 3);
        assert_eq!(config.deadline, Some(Duration::from_millis(250)));
    }

    #[test]
    fn machine_id_must_fit_the_layout() {
        assert!(parse(&[]).is_ok());
        assert!(CliArgs::try_parse_from(["ridgen", "--machine-id", "0"])
            .map_err(anyhow::Error::from)
            .and_then(MintConfig::try_from)
            .is_err());
        assert!(CliArgs::try_parse_from(["ridgen", "--machine-id", "65536"])
            .map_err(anyhow::Error::from)
            .and_then(MintConfig::try_from)
            .is_err());
    }

    #[test]
    fn non_coprime_needs_explicit_opt_in() {
        let err = parse(&["--n2", "4"]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CodeError>(),
            Some(&CodeError::N2NotCoprime { n2: 4, length: 6 })
        );
        assert!(parse(&["--n2", "4", "--allow-non-coprime"]).is_ok());
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let err = parse(&["--tag", "a-b"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidTag { .. })
        ));
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(parse(&["-n", "0"]).is_err());
    }
}

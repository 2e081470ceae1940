pub mod formats;

use flexi_logger::Logger;

use crate::Error;

/// Log to stdout. `RUST_LOG` wins over the `--verbose` default.
pub fn init(verbose: bool) -> Result<(), Error> {
    let default_spec = if verbose {
        "info,moodyme_core=debug"
    } else {
        "info"
    };
    Logger::try_with_env_or_str(default_spec)?
        .format(formats::cli_format)
        .log_to_stdout()
        .start()?;

    Ok(())
}

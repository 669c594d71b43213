//! CLI parsing and configuration module
//!
//! This module handles command-line argument parsing using clap and
//! provides configuration structures for the generator driver.

use clap::{Args, Parser as CliParser};
use hashbrown::HashSet;
use std::path::PathBuf;

use crate::lib_options::{DEFAULT_LIBRARIES, LibraryProfile};

use super::artifact::GeneratePhase;

/// CLI interface using clap
#[derive(CliParser, Debug)]
#[clap(name = "ffigen", about = "Generate Python ctypes bindings from scraped C prototypes")]
pub struct Cli {
    /// Declarations file with one `name:declaration` entry per line
    #[clap(short, long, value_name = "FILE")]
    pub protos: PathBuf,

    /// Output file for the generated module (stdout when omitted)
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Release tag appended to library names, e.g. `debug`
    #[clap(short = 't', long = "type", value_name = "TAG", default_value = "", allow_hyphen_values = true)]
    pub release: String,

    /// Version tag used for library names on Windows, e.g. `5.2`
    #[clap(short = 'V', long = "lib-version", value_name = "VER", default_value = "")]
    pub version: String,

    /// Library naming conventions
    #[clap(flatten)]
    pub library: LibraryOptions,

    /// Leave out the library-specific helpers at the end of the module
    #[clap(long)]
    pub no_footer: bool,

    /// Print the finished symbol table instead of the module
    #[clap(long)]
    pub dump_table: bool,

    /// Treat every diagnostic as an error
    #[clap(long)]
    pub werror: bool,

    /// Enable verbose diagnostic output
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct LibraryOptions {
    /// Prefix a named type must carry to be registered
    #[clap(long, default_value = "ALLEGRO_")]
    pub type_prefix: String,

    /// Prefix a symbol must carry to be bound as a function
    #[clap(long, default_value = "al_")]
    pub function_prefix: String,

    /// Skip `#define`s whose name starts with this prefix
    #[clap(long = "exclude-define-prefix", value_name = "PREFIX", action = clap::ArgAction::Append, default_values_t = vec!["_".to_string(), "GL_".to_string()])]
    pub excluded_define_prefixes: Vec<String>,

    /// Skip declarations with exactly this name
    #[clap(long = "exclude-name", value_name = "NAME", action = clap::ArgAction::Append, default_values_t = vec!["ALLEGRO_OGL_EXT_API".to_string()])]
    pub excluded_names: Vec<String>,

    /// Shared library base names probed by the loader
    #[clap(long = "dll", value_name = "NAME", action = clap::ArgAction::Append)]
    pub libraries: Vec<String>,
}

/// Configuration for one generator run
#[derive(Debug)]
pub struct GenerateConfig {
    pub protos_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub profile: LibraryProfile,
    pub stop_after: GeneratePhase,
    pub dump_table: bool,
    pub warnings_as_errors: bool,
    pub verbose: bool,
    _temp_file: Option<tempfile::TempPath>,
}

impl GenerateConfig {
    /// Create a config over declarations given as a string. The text is
    /// written to a temporary file that lives as long as the config.
    pub fn from_source_code(source: &str) -> std::io::Result<Self> {
        use std::io::Write;
        let mut tmpfile = tempfile::Builder::new().suffix(".protos").tempfile()?;
        tmpfile.write_all(source.as_bytes())?;
        let temp_path = tmpfile.into_temp_path();
        let path = temp_path.to_path_buf();

        Ok(Self {
            protos_path: path,
            output_path: None,
            profile: LibraryProfile::default(),
            stop_after: GeneratePhase::default(),
            dump_table: false,
            warnings_as_errors: false,
            verbose: false,
            _temp_file: Some(temp_path),
        })
    }
}

impl Cli {
    /// Convert CLI arguments into a generator configuration
    pub fn into_config(self) -> GenerateConfig {
        let libraries = if self.library.libraries.is_empty() {
            DEFAULT_LIBRARIES.iter().map(|s| s.to_string()).collect()
        } else {
            self.library.libraries
        };

        let profile = LibraryProfile {
            type_prefix: self.library.type_prefix,
            function_prefix: self.library.function_prefix,
            excluded_define_prefixes: self.library.excluded_define_prefixes,
            excluded_names: self.library.excluded_names.into_iter().collect::<HashSet<_>>(),
            libraries,
            release: self.release,
            version: self.version,
            footer: !self.no_footer,
        };

        GenerateConfig {
            protos_path: self.protos,
            output_path: self.output,
            profile,
            stop_after: if self.dump_table {
                GeneratePhase::Resolve
            } else {
                GeneratePhase::Emit
            },
            dump_table: self.dump_table,
            warnings_as_errors: self.werror,
            verbose: self.verbose,
            _temp_file: None,
        }
    }
}

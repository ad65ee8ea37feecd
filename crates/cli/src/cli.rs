use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "resdex")]
#[command(about = "Index layered resource directories and query the merged view")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Engine configuration file (TOML)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Resource directory of the module; repeat for overlays, lowest precedence first
	#[arg(long = "res", short = 'r', value_name = "DIR", required = true)]
	pub res: Vec<PathBuf>,

	/// Resource directory of a local dependency module; repeat for several modules
	#[arg(long = "dep", short = 'd', value_name = "DIR")]
	pub deps: Vec<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print every declaration of the merged app view
	Dump {
		/// Only print this resource type (e.g. string, layout)
		#[arg(long = "type", short = 't', value_name = "TYPE")]
		ty: Option<String>,
	},
	/// Resolve one resource for a configuration
	Resolve {
		/// Resource reference, e.g. `string/app_name` or `@string/app_name`
		reference: String,

		/// Qualifier token of the target configuration (e.g. `fr`, `land-hdpi`)
		#[arg(long, short = 'q', default_value = "")]
		qualifiers: String,

		/// Do not fall back to the default configuration
		#[arg(long)]
		exact: bool,
	},
	/// List the resource types present in the merged app view
	Types,
	/// Print the numeric id of a resource, assigning a dynamic one if needed
	Id {
		/// Resource reference, e.g. `drawable/icon`
		reference: String,
	},
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todoz::model::Mode;

#[derive(Parser, Debug)]
#[command(name = "todoz", bin_name = "todoz", version)]
#[command(about = "Stable ids for checkbox todos in markdown files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a document through a read or write pass and print the result
    Handle {
        /// Path the todos belong to (defaults to FILE)
        #[arg(short, long)]
        path: Option<String>,

        /// read (on open) or write (on save)
        #[arg(short, long, default_value = "write")]
        mode: Mode,

        /// Document to process (stdin when omitted)
        file: Option<PathBuf>,

        /// Write the result back to FILE instead of stdout
        #[arg(short, long, requires = "file")]
        in_place: bool,
    },

    /// Create a todo from a line or plain text
    #[command(alias = "n")]
    Create {
        /// Path the todo belongs to
        #[arg(short, long)]
        path: String,

        /// Todo line or text (e.g. "- [ ] call bob {t:phone}")
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },

    /// Delete a todo by id, tagged line or text
    #[command(alias = "rm")]
    Delete {
        /// Path used to match by text
        #[arg(short, long, default_value = "")]
        path: String,

        /// Id (13 or %13%), tagged line or text
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },

    /// Print every todo as one markdown document
    #[command(alias = "ls")]
    Load {
        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite OUTPUT if it exists
        #[arg(short, long, requires = "output")]
        force: bool,
    },

    /// Search todos by text, tag or path
    Search {
        #[arg(num_args = 0..)]
        terms: Vec<String>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (open-states, done-states, ambiguous-delete)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

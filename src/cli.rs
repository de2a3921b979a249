use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "deskboard")]
#[command(about = "Terminal admin dashboard for documents and employees served by a REST API")]
#[command(version)]
pub struct Cli {
    /// Base address of the API (overrides DESKBOARD_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Command to run; the interactive TUI when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive terminal UI
    Tui,

    /// List, upload, edit and delete documents
    Documents {
        #[command(subcommand)]
        action: DocumentCommand,
    },

    /// List, add, edit and delete employees
    Employees {
        #[command(subcommand)]
        action: EmployeeCommand,
    },

    /// Print dashboard metrics
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum DocumentCommand {
    /// List documents
    List {
        /// Case-insensitive text matched against name, description and status
        #[arg(short, long)]
        search: Option<String>,

        /// Exact status to keep
        #[arg(long)]
        status: Option<String>,
    },

    /// Upload a new document
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: String,

        /// Local file to upload
        #[arg(short, long)]
        file: String,
    },

    /// Change a document's name and description
    Edit {
        id: u64,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: String,
    },

    /// Delete a document
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    /// List employees
    List {
        /// Case-insensitive text matched against name and email
        #[arg(short, long)]
        search: Option<String>,

        /// Exact status to keep (approved, blocked, rejected)
        #[arg(long)]
        status: Option<String>,

        /// Exact access level to keep (edit, view, none)
        #[arg(long)]
        access: Option<String>,
    },

    /// Add an employee
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(long, default_value = "approved")]
        status: String,

        #[arg(long, default_value = "view")]
        access: String,
    },

    /// Change fields of an employee; omitted fields keep their current value
    Edit {
        id: u64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        access: Option<String>,
    },

    /// Delete an employee
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: u64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["deskboard"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.api_url.is_none());
    }

    #[test]
    fn test_global_api_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "deskboard",
            "employees",
            "list",
            "--status",
            "blocked",
            "--api-url",
            "http://10.0.0.2:5000",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://10.0.0.2:5000"));
        match cli.command {
            Some(Commands::Employees {
                action: EmployeeCommand::List { status, access, .. },
            }) => {
                assert_eq!(status.as_deref(), Some("blocked"));
                assert!(access.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_delete_requires_id() {
        assert!(Cli::try_parse_from(["deskboard", "documents", "delete"]).is_err());
        let cli = Cli::try_parse_from(["deskboard", "documents", "delete", "7", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Documents {
                action: DocumentCommand::Delete(args),
            }) => {
                assert_eq!(args.id, 7);
                assert!(args.yes);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// Submit a new account request
    Create {
        /// Requester's full name
        #[arg(long)]
        name: String,

        /// Requester's email address
        #[arg(long)]
        email: String,

        /// Requester's institute
        #[arg(long)]
        institute: String,

        /// Free-form comments
        #[arg(long)]
        comments: Option<String>,

        /// Server URL for remote operation
        #[arg(long, default_value = "")]
        server: String,

        /// Bearer token (default: INTAKE_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show account request details
    Show {
        /// Account request ID
        id: String,

        /// Server URL for remote operation
        #[arg(long, default_value = "")]
        server: String,

        /// Bearer token (default: INTAKE_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Search account requests by name, email or institute
    Search {
        /// Search key
        key: String,

        /// Server URL for remote operation
        #[arg(long, default_value = "")]
        server: String,

        /// Bearer token (default: INTAKE_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Replace the editable fields of an account request
    ///
    /// Approving a request that is not yet approved notifies the requester.
    Update {
        /// Account request ID
        id: String,

        /// Requester's full name
        #[arg(long)]
        name: String,

        /// Requester's email address
        #[arg(long)]
        email: String,

        /// Requester's institute
        #[arg(long)]
        institute: String,

        /// New status (pending, approved, rejected)
        #[arg(short, long)]
        status: String,

        /// Free-form comments; omitted clears existing comments
        #[arg(long)]
        comments: Option<String>,

        /// Server URL for remote operation
        #[arg(long, default_value = "")]
        server: String,

        /// Bearer token (default: INTAKE_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Reset a registered account request so the instructor can join again
    Reset {
        /// Account request ID
        id: String,

        /// Server URL for remote operation
        #[arg(long, default_value = "")]
        server: String,

        /// Bearer token (default: INTAKE_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Delete an account request
    Delete {
        /// Account request ID
        id: String,

        /// Server URL for remote operation
        #[arg(long, default_value = "")]
        server: String,

        /// Bearer token (default: INTAKE_TOKEN)
        #[arg(long)]
        token: Option<String>,
    },

    /// Join with a registration key
    Register {
        /// Registration key from the approval notification
        key: String,

        /// Server URL for remote operation
        #[arg(long, default_value = "")]
        server: String,

        /// Bearer token (default: INTAKE_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

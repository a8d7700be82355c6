use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run one migration from the manifest
    Run {
        #[arg(long, help = "Manifest file path")]
        manifest: String,

        /// Registered migration name
        name: String,

        #[arg(long, help = "Override the migration's batch size")]
        batch_size: Option<i64>,

        #[arg(
            long,
            help = "If set, prints the run summary as JSON instead of a table"
        )]
        json: bool,
    },

    /// List the migrations a manifest registers, in registration order
    List {
        #[arg(long, help = "Manifest file path")]
        manifest: String,
    },
}

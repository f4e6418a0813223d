use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recursica",
    about = "Recursica: design-token resolution, AA auditing, and theme export",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a CSS value, variable, or JSON reference to a hex color
    Resolve {
        /// Hex literal, `var(--recursica-…)`, or `{tokens.…}` / `{brand.…}` reference
        value: String,

        /// Path to tokens JSON
        #[arg(long)]
        tokens: String,

        /// Path to brand JSON
        #[arg(long)]
        brand: Option<String>,

        /// Path to UIKit JSON
        #[arg(long)]
        uikit: Option<String>,

        /// Active mode: light or dark
        #[arg(long, default_value = "light")]
        mode: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Step a color along its token scale
    Step {
        /// Starting hex color
        hex: String,

        /// Path to tokens JSON
        #[arg(long)]
        tokens: String,

        /// Surface the color must contrast with (used with --until-aa)
        #[arg(long, default_value = "#ffffff")]
        surface: String,

        /// darker or lighter
        #[arg(long, default_value = "darker")]
        direction: String,

        /// Keep stepping until the surface contrast reaches AA
        #[arg(long)]
        until_aa: bool,

        /// Step bound for --until-aa
        #[arg(long, default_value_t = recursica_kernel::stepping::DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Audit tone/on-tone and surface/text pairs for AA contrast
    Audit {
        /// Path to tokens JSON
        #[arg(long)]
        tokens: String,

        /// Path to brand JSON
        #[arg(long)]
        brand: String,

        /// Path to UIKit JSON
        #[arg(long)]
        uikit: Option<String>,

        /// Suggest scale replacements for failing foregrounds
        #[arg(long)]
        fix: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export tokens/brand/uikit JSON, stylesheets, and a bundle
    Export {
        /// Path to tokens JSON
        #[arg(long)]
        tokens: String,

        /// Path to brand JSON
        #[arg(long)]
        brand: String,

        /// Path to UIKit JSON
        #[arg(long)]
        uikit: String,

        /// Output directory
        #[arg(long)]
        out: String,

        /// Path to recursica.toml
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert between JSON paths and variable names
    Name {
        #[command(subcommand)]
        command: NameCommands,
    },
}

#[derive(Subcommand)]
pub enum NameCommands {
    /// Path segments to exported and internal names
    Encode {
        /// Path segments, e.g. tokens colors scale-01 500
        #[arg(required = true)]
        segments: Vec<String>,
    },

    /// Exported name to path segments
    Decode {
        /// Exported name, e.g. --recursica_tokens_colors_scale-01_500
        #[arg(allow_hyphen_values = true)]
        name: String,
    },

    /// Internal name to path segments and its specific spelling
    Path {
        /// Internal name, e.g. --recursica-brand-themes-light-layer-0-properties-surface
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
}

// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kbchat")]
#[command(version, author = "Muvon Un Limited <opensource@muvon.io>")]
#[command(about = "Chat with a language model grounded on your own documents, web pages and video transcripts", long_about = None)]
pub struct Cli {
    /// Use this config file instead of the system one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Ask a single question, optionally grounded on the given sources
    Ask {
        /// Message to send
        message: String,

        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Print the normalized text extracted from one source
    Extract {
        #[command(subcommand)]
        source: ExtractSource,
    },

    /// Show the resolved configuration
    Config,
}

/// Sources ingested before the first message
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Files whose format is detected from the extension or content, repeatable
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// PDF documents, repeatable
    #[arg(long = "pdf", value_name = "PATH")]
    pub pdfs: Vec<PathBuf>,

    /// Plain text files, repeatable
    #[arg(long = "text", value_name = "PATH")]
    pub texts: Vec<PathBuf>,

    /// Web pages, repeatable
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// Video URLs whose transcripts are ingested, repeatable
    #[arg(long = "video", value_name = "URL")]
    pub videos: Vec<String>,

    /// Credential forwarded as a session cookie when fetching transcripts
    #[arg(long, env = "KBCHAT_VIDEO_CREDENTIAL", hide_env_values = true)]
    pub credential: Option<String>,

    /// Summarize video transcripts before adding them
    #[arg(long)]
    pub summarize: bool,
}

#[derive(Subcommand, Debug)]
pub enum ExtractSource {
    /// PDF or plain text file
    File { path: PathBuf },
    /// Web page
    Url { url: String },
    /// Video transcript
    Video {
        url: String,
        /// Credential forwarded as a session cookie
        #[arg(long)]
        credential: Option<String>,
    },
}

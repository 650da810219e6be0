//! Default values for configuration

use std::time::Duration;

/// Directory created under the working directory to hold backups
pub const BACKUP_DIR_NAME: &str = "backup";
/// Appended to every backup file name
pub const BACKUP_SUFFIX: &str = ".bak";
/// Extension of the files the tool rewrites
pub const FILE_EXTENSION: &str = "md";

pub const MAX_ATTEMPTS: u32 = 5;
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);
pub const JITTER_RATIO: f64 = 0.2;

/// Ceiling on in-flight transform calls
pub const MAX_CONCURRENT: usize = 3;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_API_URL_ENV: &str = "GEMINI_API_URL";
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Instruction sent ahead of every file's content
pub const SYSTEM_PROMPT: &str = "You are an API for formatting and fixing spelling mistakes in a markdown file passed to you. Your two main focuses are DO NOT CHANGE the actual content or meaning of the file whatsoever, only rectify the grammer and make it beautifully well formatted in markdown, utilising all markdown tools. Nothing more. Ensure your response is PURELY the file, as its being used directly in the program. Dont say here you go: or anything, and dont embed in code blocks.";

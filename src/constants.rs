//! Shared constants used across the application.

/// The filename for the agents instruction file (uppercase)
pub const AGENTS_FILENAME: &str = "AGENTS.md";

/// The filename for the claude instruction file (uppercase)
pub const CLAUDE_FILENAME: &str = "CLAUDE.md";

/// The token whose presence in CLAUDE.md means it sources AGENTS.md.
///
/// Matching is plain substring containment, anywhere in the file.
pub const SOURCING_MARKER: &str = "@AGENTS.md";

/// The directive prepended to an existing CLAUDE.md (marker plus a blank line)
pub const SOURCING_DIRECTIVE: &str = "@AGENTS.md\n\n";

/// Default content for a new AGENTS.md file
pub const AGENTS_TEMPLATE: &str = "# Agent Instructions

This file contains instructions for AI agents working on this project.

## Project Overview

[Add project description here]

## Key Guidelines

- [Add important guidelines here]

## File Structure

[Describe the project structure]

## Development Workflow

[Describe how to work with this project]
";

/// CLAUDE.md that sources AGENTS.md and leaves room for tool-specific notes
pub const CLAUDE_TEMPLATE: &str = "@AGENTS.md

# Claude-Specific Instructions

Add any Claude-specific customizations below this line.
";

/// CLAUDE.md that does nothing but source AGENTS.md
pub const CLAUDE_SOURCING_ONLY: &str = "@AGENTS.md\n";

/// Name of the application, used for the global configuration directory
pub const APP_NAME: &str = "source-agents";

/// Configuration file name, both globally and inside a project
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Hidden per-project configuration directory
pub const PROJECT_CONFIG_DIR: &str = ".source-agents";

/// Directories skipped during discovery unless a config file replaces this list
pub const DEFAULT_EXCLUDE: &[&str] = &[
    // Build artifacts and dependencies
    "**/node_modules/**",
    "**/.git/**",
    "**/dist/**",
    "**/build/**",
    "**/.next/**",
    "**/target/**",
    "**/__pycache__/**",
    "**/.pytest_cache/**",
    "**/venv/**",
    "**/.venv/**",
    // Editors
    "**/.vscode/**",
    "**/.idea/**",
    // System and protected directories
    "**/.Trash/**",
    "**/Library/**",
    "**/Applications/**",
    "**/System/**",
    // Package manager caches
    "**/.npm/**",
    "**/.yarn/**",
    "**/.pnpm/**",
    "**/.cache/**",
    // User data
    "**/.local/**",
    "**/.config/**",
    // Media
    "**/Music/**",
    "**/Movies/**",
    "**/Pictures/**",
    "**/Photos/**",
];

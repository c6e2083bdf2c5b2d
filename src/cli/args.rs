//! Command-line argument parsing.

use std::path::PathBuf;

use crate::models::{ContactUpdate, Gender};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information.
    Version,
    /// Show usage.
    Help,
    /// Create an account and sign in.
    Register { email: String, name: String },
    /// Sign in with an existing account.
    Login { email: String },
    /// Sign out and clear the persisted session.
    Logout,
    /// Show the signed-in principal.
    Whoami,
    /// List the signed-in user's contacts, newest first.
    List,
    /// Add a contact.
    Add {
        name: String,
        address: String,
        phone: String,
        gender: Gender,
        image: Option<PathBuf>,
    },
    /// Edit a contact by id.
    Edit {
        id: String,
        changes: ContactUpdate,
        image: Option<PathBuf>,
    },
    /// Delete a contact by id.
    Delete { id: String },
}

/// Usage text printed by `--help` and on parse errors.
pub const USAGE: &str = "\
Usage: rolodex <command> [options]

Commands:
  register --email <email> --name <name>      create an account and sign in
  login --email <email>                       sign in (password is prompted)
  logout                                      sign out
  whoami                                      show the signed-in user
  list                                        list contacts, newest first
  add --name <name> --address <addr> --phone <phone> --gender <g> [--image <path>]
  edit <id> [--name ..] [--address ..] [--phone ..] [--gender ..] [--image <path>]
  delete <id>                                 delete a contact

Options:
  -V, --version                               show version
  -h, --help                                  show this help

Backend configuration comes from ROLODEX_ENDPOINT, ROLODEX_PROJECT_ID,
ROLODEX_DATABASE_ID, ROLODEX_COLLECTION_ID and ROLODEX_BUCKET_ID.";

/// Flag/value pairs collected after the subcommand.
#[derive(Debug, Default)]
struct Flags {
    name: Option<String>,
    email: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    image: Option<String>,
    positional: Option<String>,
}

impl Flags {
    fn collect<I: Iterator<Item = String>>(args: &mut I) -> Result<Self, String> {
        let mut flags = Self::default();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--name" => &mut flags.name,
                "--email" => &mut flags.email,
                "--address" => &mut flags.address,
                "--phone" => &mut flags.phone,
                "--gender" => &mut flags.gender,
                "--image" => &mut flags.image,
                _ if !arg.starts_with('-') && flags.positional.is_none() => {
                    flags.positional = Some(arg);
                    continue;
                }
                _ => return Err(format!("unexpected argument '{}'", arg)),
            };
            match args.next() {
                Some(value) => *slot = Some(value),
                None => return Err(format!("missing value for '{}'", arg)),
            }
        }
        Ok(flags)
    }

    fn require(value: Option<String>, flag: &str) -> Result<String, String> {
        value.ok_or_else(|| format!("missing required flag '{}'", flag))
    }

    fn gender(&self) -> Result<Option<Gender>, String> {
        self.gender.as_deref().map(str::parse).transpose()
    }
}

/// Parse command-line arguments into the command to execute.
///
/// # Examples
///
/// ```
/// use rolodex::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["rolodex".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1); // Skip the program name.
    let command = match args.next() {
        None => return Ok(CliCommand::Help),
        Some(cmd) => cmd,
    };

    match command.as_str() {
        "--version" | "-V" | "version" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "register" => {
            let flags = Flags::collect(&mut args)?;
            Ok(CliCommand::Register {
                email: Flags::require(flags.email, "--email")?,
                name: Flags::require(flags.name, "--name")?,
            })
        }
        "login" => {
            let flags = Flags::collect(&mut args)?;
            Ok(CliCommand::Login {
                email: Flags::require(flags.email, "--email")?,
            })
        }
        "logout" => Ok(CliCommand::Logout),
        "whoami" => Ok(CliCommand::Whoami),
        "list" => Ok(CliCommand::List),
        "add" => {
            let flags = Flags::collect(&mut args)?;
            let gender = flags
                .gender()?
                .ok_or_else(|| "missing required flag '--gender'".to_string())?;
            Ok(CliCommand::Add {
                name: Flags::require(flags.name, "--name")?,
                address: Flags::require(flags.address, "--address")?,
                phone: Flags::require(flags.phone, "--phone")?,
                gender,
                image: flags.image.map(PathBuf::from),
            })
        }
        "edit" => {
            let flags = Flags::collect(&mut args)?;
            let id = flags
                .positional
                .clone()
                .ok_or_else(|| "missing contact id".to_string())?;
            let mut changes = ContactUpdate::new();
            changes.name = flags.name.clone();
            changes.address = flags.address.clone();
            changes.phone = flags.phone.clone();
            changes.gender = flags.gender()?;
            let image = flags.image.map(PathBuf::from);
            if changes.is_empty() && image.is_none() {
                return Err("nothing to change".to_string());
            }
            Ok(CliCommand::Edit { id, changes, image })
        }
        "delete" => {
            let flags = Flags::collect(&mut args)?;
            let id = flags
                .positional
                .ok_or_else(|| "missing contact id".to_string())?;
            Ok(CliCommand::Delete { id })
        }
        other => Err(format!("unknown command '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, String> {
        let mut full = vec!["rolodex".to_string()];
        full.extend(args.iter().map(|s| s.to_string()));
        parse_args(full.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_no_args_shows_help() {
        assert_eq!(parse(&[]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_register() {
        assert_eq!(
            parse(&["register", "--email", "a@x.com", "--name", "A"]),
            Ok(CliCommand::Register {
                email: "a@x.com".to_string(),
                name: "A".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_register_missing_email() {
        let err = parse(&["register", "--name", "A"]).unwrap_err();
        assert!(err.contains("--email"));
    }

    #[test]
    fn test_parse_add() {
        let command = parse(&[
            "add", "--name", "Bob", "--address", "1 Rd", "--phone", "555", "--gender", "Male",
        ])
        .unwrap();
        assert_eq!(
            command,
            CliCommand::Add {
                name: "Bob".to_string(),
                address: "1 Rd".to_string(),
                phone: "555".to_string(),
                gender: Gender::Male,
                image: None,
            }
        );
    }

    #[test]
    fn test_parse_add_with_image() {
        let command = parse(&[
            "add", "--name", "Bob", "--address", "1 Rd", "--phone", "555", "--gender", "Other",
            "--image", "cat.png",
        ])
        .unwrap();
        match command {
            CliCommand::Add { image, .. } => assert_eq!(image, Some(PathBuf::from("cat.png"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_add_rejects_bad_gender() {
        let err = parse(&[
            "add", "--name", "Bob", "--address", "1 Rd", "--phone", "555", "--gender", "robot",
        ])
        .unwrap_err();
        assert!(err.contains("gender"));
    }

    #[test]
    fn test_parse_edit_partial_fields() {
        let command = parse(&["edit", "c1", "--phone", "556"]).unwrap();
        assert_eq!(
            command,
            CliCommand::Edit {
                id: "c1".to_string(),
                changes: ContactUpdate::new().with_phone("556"),
                image: None,
            }
        );
    }

    #[test]
    fn test_parse_edit_without_changes_is_rejected() {
        let err = parse(&["edit", "c1"]).unwrap_err();
        assert_eq!(err, "nothing to change");
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse(&["delete", "c1"]),
            Ok(CliCommand::Delete {
                id: "c1".to_string()
            })
        );
        assert!(parse(&["delete"]).is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse(&["frobnicate"]).unwrap_err();
        assert!(err.contains("frobnicate"));
    }
}

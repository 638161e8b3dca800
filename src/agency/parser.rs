//! Figures out what people are asking the genie for. Patterns are tried in
//! order and the first one which shows up anywhere in the message wins.

use regex::{Captures, Regex};

use super::content::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Restock,
    Adoption,
    DayCareDropOff,
    DayCarePickUp,
    Thanks,
    Abandon,
    SocialRules,
    PetAPet,
    GivePet,
    Help,
}

const COMMANDS: &[(&str, CommandKind)] = &[
    ("time to restock", CommandKind::Restock),
    (
        r"adopt (?:(?:a|an|the|one) )?([A-Za-z-]+)(?:[\s,]+([A-Za-z'-]+))?",
        CommandKind::Adoption,
    ),
    (
        r"(?:look after|take care of|drop off) my ([A-Za-z-]+)",
        CommandKind::DayCareDropOff,
    ),
    (
        r"(?:collect|pick up|get) my ([A-Za-z-]+)",
        CommandKind::DayCarePickUp,
    ),
    ("thank", CommandKind::Thanks),
    (r"abandon my ([A-Za-z-]+)", CommandKind::Abandon),
    (
        r"well[- ]actually|feigning surprise|backseat driving|subtle[- ]*ism",
        CommandKind::SocialRules,
    ),
    (r"pet the ([A-Za-z-]+)", CommandKind::PetAPet),
    (r"give my ([A-Za-z-]+) to", CommandKind::GivePet),
    ("help", CommandKind::Help),
];

/// The word which means "any of them" when adopting
const ANY_PET: &str = "pet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// The species the command is about, `None` for commands which don't take
    /// one and for adopting whatever pet is around
    pub species: Option<String>,
}

pub struct CommandParser {
    commands: Vec<(Regex, CommandKind)>,
    politeness_openers: Vec<String>,
}

impl CommandParser {
    pub fn new(content: &Content) -> Result<Self, regex::Error> {
        let commands = COMMANDS
            .iter()
            .map(|(pattern, kind)| Ok((Regex::new(&format!("(?i){}", pattern))?, *kind)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        let politeness_openers = content
            .manners
            .iter()
            .filter_map(|please| please.split_whitespace().next())
            .map(|word| word.to_lowercase())
            .collect();
        Ok(Self {
            commands,
            politeness_openers,
        })
    }

    pub fn parse(&self, message: &str) -> Option<ParsedCommand> {
        self.commands.iter().find_map(|(regex, kind)| {
            let captures = regex.captures(message)?;
            let species = match kind {
                CommandKind::Adoption => self.adoption_species(&captures),
                _ => captures.get(1).map(|word| word.as_str().to_lowercase()),
            };
            Some(ParsedCommand {
                kind: *kind,
                species,
            })
        })
    }

    /// "pet" is a command word and a species all at once: "adopt a pet dog"
    /// wants a dog, "adopt a pet please" takes whatever is in stock. The word
    /// after "pet" keeps its apostrophes so "s'il vous plait" is still polite.
    fn adoption_species(&self, captures: &Captures<'_>) -> Option<String> {
        let first = captures.get(1)?.as_str().to_lowercase();
        if first != ANY_PET {
            return Some(first);
        }
        let second = captures.get(2)?.as_str().to_lowercase();
        if self.politeness_openers.contains(&second) {
            return None;
        }
        Some(second)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandKind, CommandParser, ParsedCommand};
    use crate::agency::content::Content;

    fn parse(message: &str) -> Option<ParsedCommand> {
        CommandParser::new(&Content::default())
            .expect("patterns to compile")
            .parse(message)
    }

    fn command(kind: CommandKind, species: Option<&str>) -> Option<ParsedCommand> {
        Some(ParsedCommand {
            kind,
            species: species.map(|species| species.to_owned()),
        })
    }

    #[test]
    fn test_adoption_species() {
        assert_eq!(
            parse("@**Pet Agency Genie** adopt the dog, please!"),
            command(CommandKind::Adoption, Some("dog"))
        );
        assert_eq!(
            parse("Adopt an Owl please"),
            command(CommandKind::Adoption, Some("owl"))
        );
        assert_eq!(
            parse("adopt the t-rex please"),
            command(CommandKind::Adoption, Some("t-rex"))
        );
        assert_eq!(
            parse("adopt dog please"),
            command(CommandKind::Adoption, Some("dog"))
        );
    }

    #[test]
    fn test_adoption_pet_keyword() {
        assert_eq!(
            parse("adopt a pet dog please"),
            command(CommandKind::Adoption, Some("dog"))
        );
        assert_eq!(
            parse("adopt a pet please"),
            command(CommandKind::Adoption, None)
        );
        assert_eq!(
            parse("adopt a pet, per favore"),
            command(CommandKind::Adoption, None)
        );
        assert_eq!(parse("adopt a pet"), command(CommandKind::Adoption, None));
        assert_eq!(
            parse("adopt a pet s'il vous plait"),
            command(CommandKind::Adoption, None)
        );
        assert_eq!(
            parse("Adopt a pet S'il vous plaît"),
            command(CommandKind::Adoption, None)
        );
        assert_eq!(
            parse("adopt a pet dog s'il vous plait"),
            command(CommandKind::Adoption, Some("dog"))
        );
    }

    #[test]
    fn test_commands_with_species() {
        assert_eq!(
            parse("could you look after my cat?"),
            command(CommandKind::DayCareDropOff, Some("cat"))
        );
        assert_eq!(
            parse("I'd like to pick up my cat"),
            command(CommandKind::DayCarePickUp, Some("cat"))
        );
        assert_eq!(
            parse("abandon my t-rex"),
            command(CommandKind::Abandon, Some("t-rex"))
        );
        assert_eq!(
            parse("pet the dog"),
            command(CommandKind::PetAPet, Some("dog"))
        );
        assert_eq!(
            parse("give my dog to @**Someone Else**"),
            command(CommandKind::GivePet, Some("dog"))
        );
    }

    #[test]
    fn test_commands_without_species() {
        assert_eq!(
            parse("Time to restock!"),
            command(CommandKind::Restock, None)
        );
        assert_eq!(parse("thank you"), command(CommandKind::Thanks, None));
        assert_eq!(
            parse("well, actually"),
            None,
            "the comma breaks the phrase"
        );
        assert_eq!(
            parse("well-actually that's a llama"),
            command(CommandKind::SocialRules, None)
        );
        assert_eq!(parse("HELP"), command(CommandKind::Help, None));
        assert_eq!(parse("hello there"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // adoption comes before help in the table
        assert_eq!(
            parse("help me adopt the cat please"),
            command(CommandKind::Adoption, Some("cat"))
        );
        // and thanks before help
        assert_eq!(
            parse("thanks for the help"),
            command(CommandKind::Thanks, None)
        );
    }
}

//! All the flavour the agency speaks with, built once at startup and then only
//! ever read

use rand::seq::SliceRandom;
use rand::thread_rng;

pub const GENIE_EMOJI: &str = "🧞";
const DEFAULT_NOISE: &str = "💖";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Species {
    pub name: String,
    pub emoji: String,
    pub noise: Option<String>,
}

impl Species {
    fn new(name: &str, emoji: &str, noise: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            emoji: emoji.to_owned(),
            noise: noise.map(|noise| noise.to_owned()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Content {
    pub species: Vec<Species>,
    pub manners: Vec<String>,
    pub sad_messages: Vec<String>,
    pub thanks_responses: Vec<String>,
    /// species people ask for which we refuse, with what we say about it
    pub refusals: Vec<(String, String)>,
    pub help_text: String,
}

impl Content {
    pub fn noise_for(&self, emoji: &str) -> &str {
        self.species
            .iter()
            .find(|species| species.emoji == emoji)
            .and_then(|species| species.noise.as_deref())
            .unwrap_or(DEFAULT_NOISE)
    }

    pub fn species_named(&self, name: &str) -> Option<&Species> {
        self.species.iter().find(|species| species.name == name)
    }

    pub fn is_polite(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.manners.iter().any(|please| text.contains(please.as_str()))
    }

    pub fn refusal(&self, species: &str) -> Option<&str> {
        self.refusals
            .iter()
            .find(|(name, _)| name == species)
            .map(|(_, reply)| reply.as_str())
    }

    pub fn sad_message(&self, pet_name: &str) -> String {
        self.sad_messages
            .choose(&mut thread_rng())
            .map(|template| template.replace("{pet_name}", pet_name))
            .unwrap_or_else(|| "💔".to_owned())
    }

    pub fn thanks(&self) -> String {
        self.thanks_responses
            .choose(&mut thread_rng())
            .cloned()
            .unwrap_or_else(|| "❤️".to_owned())
    }
}

impl Default for Content {
    fn default() -> Self {
        let species = vec![
            Species::new("bat", "🦇", Some("screech!")),
            Species::new("bear", "🐻", Some("ROAR!")),
            Species::new("bee", "🐝", Some("buzz!")),
            Species::new("brontosaurus", "🦕", Some("MEEEHHH!")),
            Species::new("camel", "🐫", None),
            Species::new("cat", "🐈", Some("miaow!")),
            Species::new("caterpillar", "🐛", Some("munch!")),
            Species::new("cow", "🐄", Some("Moo!")),
            Species::new("crab", "🦀", Some("click!")),
            Species::new("crocodile", "🐊", None),
            Species::new("dog", "🐕", Some("woof!")),
            Species::new("dragon", "🐉", Some("🔥")),
            Species::new("eagle", "🦅", None),
            Species::new("elephant", "🐘", None),
            Species::new("flamingo", "🦩", None),
            Species::new("fox", "🦊", Some("Wrahh!")),
            Species::new("frog", "🐸", Some("ribbet!")),
            Species::new("giraffe", "🦒", None),
            Species::new("hedgehog", "🦔", Some("scurry, scurry, scurry")),
            Species::new("hippo", "🦛", None),
            Species::new("invader", "👾", None),
            Species::new("kangaroo", "🦘", Some("Chortle chortle!")),
            Species::new("koala", "🐨", Some("gggrrrooowwwlll")),
            Species::new("llama", "🦙", None),
            Species::new("mouse", "🐁", Some("squeak!")),
            Species::new("owl", "🦉", Some("hoot hoot!")),
            Species::new("parrot", "🦜", Some("HELLO!")),
            Species::new("penguin", "🐧", None),
            Species::new("pig", "🐖", Some("oink!")),
            Species::new("rabbit", "🐇", None),
            Species::new("rocket", "🚀", None),
            Species::new("snail", "🐌", Some("slurp!")),
            Species::new("t-rex", "🦖", Some("RAWR!")),
            Species::new("tiger", "🐅", None),
            Species::new("turtle", "🐢", Some("hiss!")),
            Species::new("unicorn", "🦄", Some("✨")),
            Species::new("rock", "🪨", Some("🤘")),
        ];

        let manners = [
            "please",
            "bitte",
            "le do thoil",
            "sudo",
            "per favore",
            "oh mighty djinn",
            "s'il vous plaît",
            "s'il vous plait",
            "svp",
            "por favor",
            "kudasai",
            "onegai shimasu",
            "пожалуйста",
        ];

        let sad_messages = [
            "Was I not a good {pet_name}?",
            "I thought you liked me.",
            "😢",
            "What will I do now?",
            "But where will I go?",
            "One day I might learn to trust again...",
            "I only wanted to make you happy.",
            "My heart hurts.",
            "Did I do something wrong?",
            "But why?",
            "💔",
        ];

        let refusals = [
            ("horse", "Sorry, that's just a picture of a horse."),
            ("genie", "You can't adopt me. I'm not a pet!"),
            (
                "apatosaurus",
                "Since 2015 the brontasaurus and apatosaurus have been recognised as separate species. Would you like to adopt a brontasaurus?",
            ),
        ];

        Self {
            species,
            manners: manners.iter().map(|please| please.to_string()).collect(),
            sad_messages: sad_messages.iter().map(|line| line.to_string()).collect(),
            thanks_responses: vec![
                "You're welcome!".to_owned(),
                "No problem!".to_owned(),
                "❤️".to_owned(),
            ],
            refusals: refusals
                .iter()
                .map(|(name, reply)| (name.to_string(), reply.to_string()))
                .collect(),
            help_text: [
                "I can help you adopt a pet! Just send me a message saying 'adopt the <pet type> please'.",
                "The agency is just north of the main space. Drop by to see the available pets, and read more instructions on the note by the door.",
            ]
            .join("\n"),
        }
    }
}

/// "a cat", "an owl", unicorns are special
pub fn a_an(noun: &str) -> String {
    if noun == "unicorn" {
        return format!("a {}", noun);
    }
    match noun.chars().next() {
        Some(first) if "AaEeIiOoUu".contains(first) => format!("an {}", noun),
        _ => format!("a {}", noun),
    }
}

pub fn upfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

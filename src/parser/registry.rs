use crate::error::{Result, SemrelError};
use crate::parser::{
    CommitParser, ConventionalCommitParser, EmojiCommitParser, ScipyCommitParser,
    TagCommitParser,
};
use std::collections::HashMap;
use tracing::debug;

/// Builds a parser from its options table
pub type ParserConstructor =
    Box<dyn Fn(&str, &toml::Table) -> Result<Box<dyn CommitParser>> + Send + Sync>;

/// Maps parser identifiers to constructors
///
/// The built-in parsers are registered by [`ParserRegistry::default`];
/// external implementations are added with [`ParserRegistry::register`] under
/// any name, including fully qualified ones such as `mycompany::Parser`.
pub struct ParserRegistry {
    constructors: HashMap<String, ParserConstructor>,
}

impl ParserRegistry {
    /// Registry without any parsers
    pub fn empty() -> Self {
        ParserRegistry {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor under `name`, replacing any earlier one
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&str, &toml::Table) -> Result<Box<dyn CommitParser>> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SemrelError::parser("Commit parser name cannot be empty"));
        }
        self.constructors.insert(name, Box::new(constructor));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Construct the parser registered under `name`
    ///
    /// Unknown names and rejected options are configuration errors.
    pub fn build(&self, name: &str, options: &toml::Table) -> Result<Box<dyn CommitParser>> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            SemrelError::parser(format!(
                "Unknown commit parser '{}' (available: {})",
                name,
                self.names().join(", ")
            ))
        })?;

        let parser = constructor(name, options)?;
        debug!(parser = name, "commit parser loaded");
        Ok(parser)
    }
}

fn constructor<F>(f: F) -> ParserConstructor
where
    F: Fn(&str, &toml::Table) -> Result<Box<dyn CommitParser>> + Send + Sync + 'static,
{
    Box::new(f)
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = ParserRegistry::empty();
        let builtins = [
            (
                ConventionalCommitParser::NAME,
                constructor(|name, options| {
                    Ok(Box::new(ConventionalCommitParser::from_table(name, options)?) as Box<dyn CommitParser>)
                }),
            ),
            (
                "angular",
                constructor(|name, options| {
                    Ok(Box::new(ConventionalCommitParser::from_table(name, options)?) as Box<dyn CommitParser>)
                }),
            ),
            (
                EmojiCommitParser::NAME,
                constructor(|name, options| {
                    Ok(Box::new(EmojiCommitParser::from_table(name, options)?) as Box<dyn CommitParser>)
                }),
            ),
            (
                ScipyCommitParser::NAME,
                constructor(|name, options| {
                    Ok(Box::new(ScipyCommitParser::from_table(name, options)?) as Box<dyn CommitParser>)
                }),
            ),
            (
                TagCommitParser::NAME,
                constructor(|name, options| {
                    Ok(Box::new(TagCommitParser::from_table(name, options)?) as Box<dyn CommitParser>)
                }),
            ),
        ];
        for (name, constructor) in builtins {
            registry.constructors.insert(name.to_string(), constructor);
        }
        registry
    }
}

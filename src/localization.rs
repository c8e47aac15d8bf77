use anyhow::Result;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");
const FR_MESSAGES: &str = include_str!("../locales/fr/main.ftl");

/// Languages with a bundled message file
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "fr"];

/// Localization manager for kitchen confirmations and alerts
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every bundled locale
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for locale_str in SUPPORTED_LANGUAGES {
            let locale: LanguageIdentifier = locale_str.parse()?;
            let bundle = Self::create_bundle(&locale, Self::source_for(locale_str))?;
            bundles.insert(locale_str.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    fn source_for(locale: &str) -> &'static str {
        match locale {
            "fr" => FR_MESSAGES,
            _ => EN_MESSAGES,
        }
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Messages are printed to a terminal; no bidi isolation marks
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow::anyhow!("invalid {} messages: {:?}", locale, errors))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("duplicate {} messages: {:?}", locale, errors))?;

        Ok(bundle)
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self.bundles.get(language).or_else(|| self.bundles.get("en")) {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        let mut value = String::new();
        let _ = bundle.write_pattern(&mut value, pattern, fluent_args.as_ref(), &mut vec![]);
        value
    }

    /// Get a localized message with arguments in a specific language
    pub fn get_message_with_args_in_language(
        &self,
        key: &str,
        language: &str,
        args: &[(&str, &str)],
    ) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }
}

/// Create a shared localization manager
pub fn create_localization_manager() -> Result<Arc<LocalizationManager>> {
    Ok(Arc::new(LocalizationManager::new()?))
}

thread_local! {
    static LOCALIZATION_MANAGER: RefCell<Option<LocalizationManager>> = const { RefCell::new(None) };
}

/// Initialize the thread-local localization manager
pub fn init_localization() -> Result<()> {
    LOCALIZATION_MANAGER.with(|cell| {
        let mut manager = cell.borrow_mut();
        if manager.is_none() {
            *manager = Some(LocalizationManager::new()?);
        }
        Ok(())
    })
}

/// Run `f` against this thread's manager, initializing it on first use
///
/// Returns `None` only if the bundled messages fail to load.
pub fn with_localization_manager<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&LocalizationManager) -> R,
{
    if let Err(e) = init_localization() {
        tracing::error!(error = %e, "Failed to initialize localization");
        return None;
    }
    LOCALIZATION_MANAGER.with(|cell| cell.borrow().as_ref().map(f))
}

/// Get a localized message in the requested language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    let language = detect_language(language_code);
    with_localization_manager(|manager| manager.get_message_in_language(key, &language, None))
        .unwrap_or_else(|| key.to_string())
}

/// Get a localized message with arguments in the requested language
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let language = detect_language(language_code);
    with_localization_manager(|manager| {
        manager.get_message_with_args_in_language(key, &language, args)
    })
    .unwrap_or_else(|| key.to_string())
}

/// Resolve a language tag such as `fr-FR` to a supported language, default `en`
pub fn detect_language(language_code: Option<&str>) -> String {
    if let Some(code) = language_code {
        let lang = code
            .split(['-', '_'])
            .next()
            .unwrap_or("en")
            .to_lowercase();

        if SUPPORTED_LANGUAGES.contains(&lang.as_str()) {
            return lang;
        }
    }

    "en".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language(Some("fr-FR")), "fr");
        assert_eq!(detect_language(Some("en_GB")), "en");
        assert_eq!(detect_language(Some("de")), "en");
        assert_eq!(detect_language(None), "en");
    }

    #[test]
    fn test_missing_key_is_reported() {
        assert_eq!(t_lang("no-such-key", Some("en")), "Missing translation: no-such-key");
    }
}

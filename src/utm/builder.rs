use log::{debug, info};

use super::link::ensure_trailing_slash;
use super::policy::BrandPolicy;
use super::slug::normalize_slug;
use super::validation::validate_input;
use crate::common::{FormInput, UtmError, UtmParams, UtmRecord};
use crate::store::HistoryStore;

/// Outcome of one form submission. The record is kept even when saving fails
/// so the link can still be copied by hand.
#[derive(Debug)]
pub struct Submission {
    pub record: UtmRecord,
    pub saved: Result<(), UtmError>,
}

impl Submission {
    pub fn link(&self) -> &str {
        &self.record.generated_link
    }

    pub fn is_saved(&self) -> bool {
        self.saved.is_ok()
    }
}

pub struct LinkBuilder {
    brand: BrandPolicy,
}

impl LinkBuilder {
    pub fn new(brand: BrandPolicy) -> Self {
        Self { brand }
    }

    /// Validates, normalizes and assembles a record. Touches no state.
    pub fn generate(&self, input: &FormInput) -> Result<UtmRecord, UtmError> {
        validate_input(input)?;

        let params = UtmParams {
            source: normalize_slug(&input.source),
            medium: normalize_slug(&input.medium),
            campaign: normalize_slug(&input.campaign),
            term: normalize_slug(&input.term),
            content: normalize_slug(&input.content),
        };
        debug!("Normalized params: {:?}", params);

        let emptied: Vec<&'static str> = [
            ("source", &params.source),
            ("medium", &params.medium),
            ("campaign", &params.campaign),
        ]
        .into_iter()
        .filter(|(_, slug)| slug.is_empty())
        .map(|(name, _)| name)
        .collect();
        if !emptied.is_empty() {
            return Err(UtmError::MissingField(emptied));
        }

        let params = UtmParams {
            campaign: self.brand.apply(&params.campaign)?,
            ..params
        };

        let base_url = ensure_trailing_slash(&input.base_url);
        Ok(UtmRecord::new(base_url, params))
    }

    /// Generates a record and appends it to the store. Validation errors are
    /// returned as `Err`; a failed append still yields the record.
    pub fn submit(
        &self,
        input: &FormInput,
        store: &mut dyn HistoryStore,
    ) -> Result<Submission, UtmError> {
        let record = self.generate(input)?;
        info!("Generated link: {}", record.generated_link);

        let saved = match store.append(&record) {
            Ok(()) => {
                info!("Link saved to {}", store.describe());
                Ok(())
            }
            Err(e) => {
                debug!("Append to {} failed: {}", store.describe(), e);
                Err(UtmError::StoreUnavailable(e))
            }
        };

        Ok(Submission { record, saved })
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new(BrandPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utm::BrandMode;

    fn form(base_url: &str, source: &str, medium: &str, campaign: &str) -> FormInput {
        FormInput {
            base_url: base_url.to_string(),
            source: source.to_string(),
            medium: medium.to_string(),
            campaign: campaign.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_reference_example() {
        let record = LinkBuilder::default()
            .generate(&form("https://example.com", "Google", "CPC", "Black Friday"))
            .unwrap();
        assert_eq!(record.base_url, "https://example.com/");
        assert_eq!(
            record.generated_link,
            "https://example.com/?utm_source=google&utm_medium=cpc&utm_campaign=black-friday"
        );
        assert!(record.is_consistent());
    }

    #[test]
    fn test_generate_keeps_optionals_when_present() {
        let mut input = form("https://example.com/", "Google", "CPC", "Black Friday");
        input.term = "Running Shoes".to_string();
        input.content = "Banner A".to_string();
        let record = LinkBuilder::default().generate(&input).unwrap();
        assert_eq!(record.term, "running-shoes");
        assert!(record
            .generated_link
            .ends_with("&utm_term=running-shoes&utm_content=banner-a"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let builder = LinkBuilder::default();
        let input = form("https://example.com", "Google", "CPC", "Black Friday");
        assert_eq!(
            builder.generate(&input).unwrap(),
            builder.generate(&input).unwrap()
        );
    }

    #[test]
    fn test_required_slug_emptied_by_normalization() {
        let result =
            LinkBuilder::default().generate(&form("https://example.com", "!!!", "cpc", "promo"));
        match result {
            Err(UtmError::MissingField(fields)) => assert_eq!(fields, vec!["source"]),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_brand_reject_blocks_generation() {
        let builder = LinkBuilder::new(BrandPolicy::new(BrandMode::Reject, "macfor"));
        let result = builder.generate(&form("https://example.com", "google", "cpc", "promo"));
        assert!(matches!(result, Err(UtmError::PolicyViolation(_))));
    }

    #[test]
    fn test_brand_prefix_rewrites_campaign() {
        let builder = LinkBuilder::new(BrandPolicy::new(BrandMode::Prefix, "macfor"));
        let record = builder
            .generate(&form("https://example.com", "google", "cpc", "Black Friday"))
            .unwrap();
        assert_eq!(record.campaign, "macfor-black-friday");
        assert!(record.is_consistent());
    }
}

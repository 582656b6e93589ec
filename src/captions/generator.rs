//! One-shot caption generation against a page
//!
//! `generate_captions` is the whole click handler: guard, mark the button
//! busy, ask the model once, and only then touch the selection control.
//! Failures never leave a partial caption group behind.

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use super::prompt::build_request;
use super::{CaptionContext, CaptionError, CaptionList};
use crate::llm::CaptionModel;
use crate::photo::{EmojiSelection, PhotoData};
use crate::ui::{
    AI_GROUP_ID, AI_GROUP_LABEL, CaptionObserver, CaptionOption, CaptionPage, CaptionSelect,
    OptionGroup, UserNotifier,
};

#[derive(Deserialize)]
struct CaptionResponse {
    #[serde(default)]
    captions: Option<Vec<String>>,
}

/// Parse model output text into a non-empty caption list
pub fn parse_captions(text: &str) -> Result<CaptionList, CaptionError> {
    let response: CaptionResponse = serde_json::from_str(text.trim())?;
    response
        .captions
        .and_then(CaptionList::new)
        .ok_or(CaptionError::EmptyResult)
}

/// Replace the AI caption group with `captions` and select the first one
pub fn insert_ai_group(select: &mut CaptionSelect, captions: &CaptionList) {
    select.remove_group(AI_GROUP_ID);

    let mut group = OptionGroup::new(AI_GROUP_ID, AI_GROUP_LABEL);
    for caption in captions.iter() {
        group.push(CaptionOption::caption(caption));
    }
    select.add_group(group);
    select.set_value(captions.first());
}

pub struct CaptionGenerator<M> {
    model: M,
}

impl<M: CaptionModel> CaptionGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Generate captions for `ctx` and reflect them into `page`.
    ///
    /// The button is busy for exactly the duration of the call and is idle
    /// again on return; the observer hears both transitions. On success it
    /// also fires once with the newly selected caption. On failure the user gets a notice, the cause is
    /// logged, and the selection control is untouched.
    pub async fn generate_captions(
        &self,
        ctx: &CaptionContext,
        page: &mut CaptionPage,
        notifier: &dyn UserNotifier,
        observer: &dyn CaptionObserver,
    ) -> Result<CaptionList, CaptionError> {
        let Some(photo) = ctx.photo.as_ref() else {
            warn!("Caption generation requested without a photo");
            let err = CaptionError::MissingPhoto;
            notifier.notify(err.user_notice());
            return Err(err);
        };

        let CaptionPage { button, select } = page;
        let _busy = button.busy(observer);

        info!(
            "Generating captions with {} for {} ({} emojis)",
            self.model.name(),
            photo,
            ctx.emojis.len()
        );

        match self.request_captions(photo, &ctx.emojis).await {
            Ok(captions) => {
                insert_ai_group(select, &captions);
                info!("Inserted {} AI captions", captions.len());
                observer.caption_changed(captions.first());
                Ok(captions)
            }
            Err(err) => {
                error!("Error generating AI captions: {}", err);
                notifier.notify(err.user_notice());
                Err(err)
            }
        }
    }

    async fn request_captions(
        &self,
        photo: &PhotoData,
        emojis: &EmojiSelection,
    ) -> Result<CaptionList, CaptionError> {
        let request = build_request(photo, emojis);
        let text = self.model.generate_structured(&request).await?;
        debug!("Caption response: {} chars", text.len());
        parse_captions(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_captions_keeps_order() {
        let list = parse_captions(r#"{"captions":["A","B","C","D","E"]}"#).unwrap();
        assert_eq!(list.as_slice(), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_parse_captions_missing_and_empty_are_one_kind() {
        assert!(matches!(parse_captions(r#"{}"#), Err(CaptionError::EmptyResult)));
        assert!(matches!(parse_captions(r#"{"captions":[]}"#), Err(CaptionError::EmptyResult)));
        assert!(matches!(parse_captions(r#"{"captions":null}"#), Err(CaptionError::EmptyResult)));
    }

    #[test]
    fn test_parse_captions_rejects_malformed() {
        assert!(matches!(parse_captions("not json"), Err(CaptionError::Parse(_))));
        assert!(matches!(parse_captions(r#"{"captions":[1,2]}"#), Err(CaptionError::Parse(_))));
        assert!(matches!(parse_captions(r#"["A"]"#), Err(CaptionError::Parse(_))));
    }

    #[test]
    fn test_insert_ai_group_replaces_previous() {
        let mut select = CaptionSelect::new();
        select.add_option(CaptionOption::caption("manual"));

        insert_ai_group(&mut select, &CaptionList::new(vec!["old".into()]).unwrap());
        insert_ai_group(
            &mut select,
            &CaptionList::new(vec!["new 1".into(), "new 2".into()]).unwrap(),
        );

        assert_eq!(select.groups().len(), 1);
        let group = select.group(AI_GROUP_ID).unwrap();
        assert_eq!(group.label, AI_GROUP_LABEL);
        assert_eq!(group.values(), vec!["new 1", "new 2"]);
        assert_eq!(select.value(), Some("new 1"));
        assert_eq!(select.options(), vec!["manual", "new 1", "new 2"]);
    }
}

//! String patch for the streak display template (`STREAK_BLOCK_TEMPLATE`).
//!
//! The only non-JSON config: a Velocity template with `#if/#elseif/#else`
//! chains keyed on `$!campaign_id`. There is no structured parser for it, so
//! this module edits it as text, anchored on the two terminal `#else`
//! clauses. A missing anchor fails the whole operation; the input template is
//! never partially patched.
//!
//! Removal is not automated: pulling a campaign out of free text is unsafe,
//! so batch removal only detects the campaign and asks for manual cleanup.

use crate::MergeError;
use log::debug;
use regex::Regex;

/// What the banner step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerAction {
    /// The banner condition already tests this campaign id.
    AlreadyPresent,
    /// The id was OR-ed into an existing condition for the same banner URL.
    AddedToSharedCondition,
    /// A new `#elseif` block was spliced in for a previously unseen URL.
    NewConditionBlock,
}

/// What the bottom-sheet step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BottomSheetAction {
    /// A bottom-sheet block for this campaign id already exists.
    AlreadyPresent,
    /// A new bottom-sheet block was spliced in.
    Added,
}

/// Result of patching a campaign into the template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOutcome {
    /// The patched template text.
    pub template: String,
    /// What happened in the banner step.
    pub banner: BannerAction,
    /// What happened in the bottom-sheet step.
    pub bottom_sheet: BottomSheetAction,
}

/// Whether the template references a campaign id anywhere.
pub fn contains_campaign(template: &str, campaign_id: &str) -> bool {
    template.contains(&id_test(campaign_id))
}

/// Patch a campaign into the template: OR its id into (or create) the banner
/// URL condition, then splice a bottom-sheet block. Both steps are
/// duplicate-guarded; an unlocatable anchor fails the whole operation.
pub fn add_campaign(
    template: &str,
    campaign_id: &str,
    banner_url: &str,
    bottom_sheet_title: &str,
    bottom_sheet_subtitle: &str,
) -> Result<TemplateOutcome, MergeError> {
    let mut patched = template.to_string();
    let id_test = id_test(campaign_id);

    let banner_condition = pattern(&format!(
        r#"(#elseif\([^)]*\))\s*"url":\s*"{}""#,
        regex::escape(banner_url)
    ));
    let banner = if let Some(caps) = banner_condition.captures(&patched) {
        let condition = caps[1].to_string();
        if condition.contains(&id_test) {
            debug!("banner condition already tests campaign id {campaign_id}");
            BannerAction::AlreadyPresent
        } else {
            let widened = format!("{} || {})", condition.trim_end_matches(')'), id_test);
            debug!("widening shared banner condition for campaign id {campaign_id}");
            patched = patched.replacen(&condition, &widened, 1);
            BannerAction::AddedToSharedCondition
        }
    } else {
        let anchor = pattern(r#"(#elseif\(\$!campaign_id[^#]+)\s+(#else\s+"url":)"#);
        let caps = anchor
            .captures(&patched)
            .ok_or(MergeError::TemplateStructureNotFound("banner #else clause"))?;
        let at = caps
            .get(2)
            .map(|m| m.start())
            .ok_or(MergeError::TemplateStructureNotFound("banner #else clause"))?;
        debug!("splicing new banner block for campaign id {campaign_id}");
        patched.insert_str(at, &banner_block(&id_test, banner_url));
        BannerAction::NewConditionBlock
    };

    let guard = pattern(&format!(
        r#"#elseif\({}\)\s*#if\(\$streak_item\.status"#,
        regex::escape(&id_test)
    ));
    let bottom_sheet = if guard.is_match(&patched) {
        debug!("bottom-sheet block already present for campaign id {campaign_id}");
        BottomSheetAction::AlreadyPresent
    } else {
        let anchor = pattern(r#"(#end\s+)(#else\s+#if\(\$streak_item\.status)"#);
        let caps = anchor.captures(&patched).ok_or(
            MergeError::TemplateStructureNotFound("bottom sheet #else clause"),
        )?;
        let at = caps
            .get(2)
            .map(|m| m.start())
            .ok_or(MergeError::TemplateStructureNotFound("bottom sheet #else clause"))?;
        debug!("splicing bottom-sheet block for campaign id {campaign_id}");
        patched.insert_str(
            at,
            &bottom_sheet_block(&id_test, bottom_sheet_title, bottom_sheet_subtitle),
        );
        BottomSheetAction::Added
    };

    Ok(TemplateOutcome {
        template: patched,
        banner,
        bottom_sheet,
    })
}

/// The equality test the template uses to select a campaign.
fn id_test(campaign_id: &str) -> String {
    format!("$!campaign_id == \"{campaign_id}\"")
}

/// Compile a pattern whose dynamic parts went through `regex::escape`.
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("anchor pattern is valid")
}

fn banner_block(id_test: &str, banner_url: &str) -> String {
    format!(
        "#elseif({id_test})\r\n              \"url\": \"{banner_url}\",\r\n              "
    )
}

fn bottom_sheet_block(id_test: &str, title: &str, subtitle: &str) -> String {
    format!(
        concat!(
            "#elseif({id_test})\r\n",
            "              #if($streak_item.status != \"allotted\" && $streak_item.status != \"claimed\")\r\n",
            "              ,\r\n",
            "          \"bottom_sheet\": {{\r\n",
            "              \"reward_details\": {{\r\n",
            "                  \"title\": \"{title}\",\r\n",
            "                  \"subtitle\": \"{subtitle}\"\r\n",
            "              }}\r\n",
            "          }}\r\n",
            "              #end\r\n",
            "          "
        ),
        id_test = id_test,
        title = title,
        subtitle = subtitle
    )
}

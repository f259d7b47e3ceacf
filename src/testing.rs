//! Testing utilities for nslsl
//!
//! Fixture result fragments shaped like the search controller's output.
//!
//! Only available when compiled with `cfg(test)`.

use crate::client::{ResultFragment, ResultRecord};
use crate::selection::ItemId;

/// A result page: 3 results in total over 2 pages, 2 shown
pub const RESULT_PAGE: &str = r##"
<div id="searchResults">
  <input type="hidden" id="searchResultCount" value="3" />
  <input type="hidden" id="NumPages" value="2" />
  <ul class="results">
    <li>
      <input type="checkbox" class="selectItem" value="101" />
      <a class="pubDetail" data-pubid="101" href="#">Bone loss in microgravity</a>
      <span class="authors">Smith J, Lee K</span>
    </li>
    <li>
      <input type="checkbox" class="selectItem" value="102" />
      <a class="pubDetail" data-pubid="102" href="#">
        Muscle &amp; tendon &lt;adaptation&gt;
      </a>
    </li>
  </ul>
  <a href="#" class="pageLink" data-page="2">Next</a>
</div>
"##;

/// A page showing `ids`, out of `total` results
///
/// The page count assumes every page holds as many results as this one.
/// Titles are `Result <id>`.
#[must_use]
pub fn fragment_with_ids(ids: &[&str], total: u64) -> ResultFragment {
    let per_page = ids.len().max(1) as u64;
    let total_pages = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);

    let records: Vec<ResultRecord> = ids
        .iter()
        .map(|id| ResultRecord {
            id: ItemId::from(*id),
            title: format!("Result {id}"),
        })
        .collect();

    let mut html = format!(
        "<input id=\"searchResultCount\" value=\"{total}\"><input id=\"NumPages\" value=\"{total_pages}\">"
    );
    for record in &records {
        html.push_str(&format!(
            "<a class=\"pubDetail\" data-pubid=\"{}\">{}</a>",
            record.id, record.title
        ));
    }

    ResultFragment {
        html,
        total_results: Some(total),
        total_pages: Some(total_pages),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_fragment_parses_to_itself() {
        let fragment = fragment_with_ids(&["1", "2", "3"], 7);
        assert_eq!(fragment.total_pages, Some(3));
        assert_eq!(ResultFragment::parse(&fragment.html), fragment);
    }
}

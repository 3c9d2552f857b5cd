use crate::wsse::constants::{MUST_UNDERSTAND_ATTRIBUTE, WSU_NAMESPACE};
use crate::wsse::fragment::{Element, Node, SecurityFragment};

/// Builds single-child [`SecurityFragment`]s and numbers their `wsu:Id`s.
///
/// The factory owns the id counter. It is incremented once for every
/// fragment that receives a `wsu:Id` and never reset, so two fragments
/// built by the same factory always carry distinct ids.
///
/// # Example
///
/// ```rust
/// use wsse_header::{Element, FragmentFactory};
///
/// let mut factory = FragmentFactory::new();
/// let body = Element::new()
///     .with_text("wsu:Created", "2024-01-01T00:00:00Z")
///     .with_text("wsu:Expires", "2024-01-01T00:01:00Z");
///
/// let fragment = factory.build(Some("wsu"), "Timestamp", body, None, false);
/// assert_eq!(fragment.order(), ["wsu:Timestamp"]);
/// assert_eq!(
///     fragment.content().attribute("wsu:Timestamp", "wsu:Id"),
///     Some("Timestamp-1")
/// );
/// ```
#[derive(Debug, Default)]
pub struct FragmentFactory {
    count: u64,
}

impl FragmentFactory {
    /// Creates a factory whose first id suffix will be `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    fn next_id(&mut self) -> u64 {
        self.count += 1;
        self.count
    }

    /// Builds a fragment holding `body` under `<prefix>:<tag>`.
    ///
    /// `extra` holds additional root children and their attributes. Its
    /// children follow the primary one unless `extra` also lists the
    /// primary key, in which case `extra`'s order is used.
    ///
    /// A regular fragment gets `wsu:Id="<tag>-<n>"` and `xmlns:wsu` on its
    /// child. A signature request instead marks the root
    /// `soapenv:mustUnderstand="1"` and receives no id.
    pub fn build(
        &mut self,
        prefix: Option<&str>,
        tag: &str,
        body: impl Into<Node>,
        extra: Option<Element>,
        signature_request: bool,
    ) -> SecurityFragment {
        let key = match prefix {
            Some(ns) => format!("{ns}:{tag}"),
            None => tag.to_string(),
        };

        let mut content = Element::new();
        content.insert(key.as_str(), body);

        if let Some(extra) = extra {
            let preferred = extra
                .contains_key(&key)
                .then(|| extra.order().to_vec());
            content.merge(extra);
            if let Some(preferred) = preferred {
                content.reorder(preferred.as_slice());
            }
        }

        let mut fragment = SecurityFragment::new(content);
        if signature_request {
            fragment.set_attribute(MUST_UNDERSTAND_ATTRIBUTE, "1");
        } else {
            let id = format!("{tag}-{}", self.next_id());
            let content = fragment.content_mut();
            content.set_attribute(key.as_str(), "wsu:Id", id);
            content.set_attribute(key.as_str(), "xmlns:wsu", WSU_NAMESPACE);
        }

        tracing::debug!(element = %key, signature_request, "Built security fragment");
        fragment
    }
}

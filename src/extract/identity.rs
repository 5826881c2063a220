use tracing::warn;

use super::Extractor;
use crate::dom::DocumentTree;
use crate::error::ExtractionError;
use crate::models::Identity;

/// Split a composite identifier on its first `@`
///
/// Everything after the first `@` is the host, so `"a@b@c"` yields `("a", "b@c")`.
pub fn split_composite_identifier(raw: &str) -> Option<(&str, &str)> {
    raw.split_once('@')
}

impl Extractor {
    /// Resolve the member identity carried by `node`
    ///
    /// Reads the display name and the composite identifier attributes. A missing display
    /// name resolves to an empty `realname`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MalformedIdentity`] when the identifier attribute is
    /// absent or has no `@`.
    pub fn resolve_identity<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        node: T::Node,
    ) -> Result<Identity, ExtractionError> {
        let raw = tree.attribute(node, &self.attributes.identity);
        let (user, host) = raw
            .and_then(split_composite_identifier)
            .ok_or_else(|| ExtractionError::MalformedIdentity { raw: raw.map(str::to_string) })?;
        let realname = tree.attribute(node, &self.attributes.name).unwrap_or_default();

        Ok(Identity::new(realname, user, host))
    }

    /// Resolve the author of a message node, falling back to a placeholder identity
    pub(crate) fn resolve_author<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        message: T::Node,
    ) -> (Identity, Option<ExtractionError>) {
        let Some(member) = tree.first_descendant(message, &self.selectors.member) else {
            warn!("Message has no author node, using placeholder identity");
            return (Identity::unknown(None), Some(ExtractionError::StructuralAbsence { what: "author" }));
        };

        match self.resolve_identity(tree, member) {
            Ok(identity) => (identity, None),
            Err(e) => {
                warn!("Unresolvable message author, using placeholder identity: {}", e);
                let realname = tree.attribute(member, &self.attributes.name);
                (Identity::unknown(realname), Some(e))
            }
        }
    }
}

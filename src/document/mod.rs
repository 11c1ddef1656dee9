mod element;

pub use element::Element;

use crate::error::{AttributeError, DocumentError};

/// Tag of the root element of a Neurolucida document.
pub const ROOT_TAG: &str = "mbf";

/// Read access to one element of a parsed document.
///
/// The builders only need tags, string attributes and ordered children, so
/// any XML tree can feed them. Implemented for [`roxmltree::Node`] and the
/// owned [`Element`]. Implementors are cheap handles (references or node cursors), so children
/// are returned by value.
pub trait ElementNode: Sized + Copy {
    /// Returns the element's tag name.
    fn tag(&self) -> &str;

    /// Returns the value of attribute `name`, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Returns the element children in document order.
    fn children(&self) -> Vec<Self>;

    /// Returns the element children tagged `tag`, in document order.
    fn children_tagged(&self, tag: &str) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter(|child| child.tag() == tag)
            .collect()
    }
}

impl<'a, 'input> ElementNode for roxmltree::Node<'a, 'input> {
    fn tag(&self) -> &str {
        self.tag_name().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        roxmltree::Node::attribute(self, name)
    }

    fn children(&self) -> Vec<Self> {
        roxmltree::Node::children(self)
            .filter(roxmltree::Node::is_element)
            .collect()
    }
}

/// Checks that `root` is a Neurolucida root element.
///
/// # Errors
///
/// Returns [`DocumentError::MissingRoot`] if there is no root, or
/// [`DocumentError::WrongRoot`] if its tag is not [`ROOT_TAG`].
pub fn expect_root<N: ElementNode>(root: Option<N>) -> Result<N, DocumentError> {
    let root = root.ok_or(DocumentError::MissingRoot)?;
    if root.tag() == ROOT_TAG {
        Ok(root)
    } else {
        Err(DocumentError::WrongRoot {
            found: root.tag().to_owned(),
        })
    }
}

/// Returns a required string attribute.
///
/// # Errors
///
/// Returns [`AttributeError::Missing`] if the attribute is absent.
pub fn required_attribute<'n, N: ElementNode>(
    node: &'n N,
    name: &'static str,
) -> Result<&'n str, AttributeError> {
    node.attribute(name).ok_or_else(|| AttributeError::Missing {
        element: node.tag().to_owned(),
        attribute: name,
    })
}

/// Returns a required attribute parsed as a finite decimal number.
///
/// # Errors
///
/// Returns [`AttributeError::Missing`] if the attribute is absent, or
/// [`AttributeError::InvalidNumber`] if it is not a finite number.
pub fn required_f64<N: ElementNode>(node: &N, name: &'static str) -> Result<f64, AttributeError> {
    let raw = required_attribute(node, name)?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AttributeError::InvalidNumber {
            element: node.tag().to_owned(),
            attribute: name,
            value: raw.to_owned(),
        })
}

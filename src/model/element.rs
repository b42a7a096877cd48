//! Structural element tree
//!
//! The parsed model of one element occurrence: name, inline attributes,
//! ordinary children, property elements (`<Type.Property>` syntax), and
//! the residual text content once child markup is accounted for. Offsets
//! are absolute byte positions in the originating document; a cached tree
//! can be rebased when the same text recurs at a different position.

use crate::core::scanner::split_name;

/// One inline attribute. `offset`/`len` span the attribute's value
/// (the text between the quotes), not the whole `name="value"` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XamlAttribute {
    pub name: String,
    pub value: String,
    pub offset: usize,
    pub len: usize,
}

/// Value carried by a property element
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Plain text content
    Text(String),
    /// A single nested element
    Element(XamlElement),
    /// A list of sibling nested elements
    Elements(Vec<XamlElement>),
}

/// An attribute expressed as `<Type.Property>...</Type.Property>` child
/// markup. `offset`/`len` span the whole construct including its tags.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyElement {
    /// Property name without the owning type prefix (`RowDefinitions`,
    /// not `Grid.RowDefinitions`)
    pub name: String,
    pub value: PropertyValue,
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XamlElement {
    /// Element name as written, possibly prefixed
    pub name: String,
    pub attributes: Vec<XamlAttribute>,
    pub children: Vec<XamlElement>,
    pub property_elements: Vec<PropertyElement>,
    /// Trimmed inner text with all child and property-element markup removed
    pub content: String,
    pub offset: usize,
    pub len: usize,
}

impl XamlElement {
    /// Name without any namespace prefix
    pub fn local_name(&self) -> &str {
        split_name(&self.name).1
    }

    pub fn attribute(&self, name: &str) -> Option<&XamlAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn property_element(&self, name: &str) -> Option<&PropertyElement> {
        self.property_elements.iter().find(|p| p.name == name)
    }

    /// Attribute value by name, inline form only
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|a| a.value.as_str())
    }

    /// Shift this tree so its root sits at `new_offset`, moving every
    /// nested offset by the same amount
    pub fn rebase(&mut self, new_offset: usize) {
        let delta = new_offset as isize - self.offset as isize;
        if delta != 0 {
            self.shift(delta);
        }
    }

    fn shift(&mut self, delta: isize) {
        self.offset = (self.offset as isize + delta) as usize;
        for attr in &mut self.attributes {
            attr.offset = (attr.offset as isize + delta) as usize;
        }
        for child in &mut self.children {
            child.shift(delta);
        }
        for prop in &mut self.property_elements {
            prop.offset = (prop.offset as isize + delta) as usize;
            match &mut prop.value {
                PropertyValue::Text(_) => {}
                PropertyValue::Element(el) => el.shift(delta),
                PropertyValue::Elements(els) => {
                    for el in els {
                        el.shift(delta);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, offset: usize, len: usize) -> XamlElement {
        XamlElement {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            property_elements: Vec::new(),
            content: String::new(),
            offset,
            len,
        }
    }

    #[test]
    fn test_local_name_strips_prefix() {
        let el = leaf("ctl:TextBlock", 0, 10);
        assert_eq!(el.local_name(), "TextBlock");
        let el = leaf("TextBlock", 0, 10);
        assert_eq!(el.local_name(), "TextBlock");
    }

    #[test]
    fn test_rebase_shifts_nested_offsets() {
        let mut root = leaf("Grid", 100, 50);
        root.attributes.push(XamlAttribute {
            name: "Margin".to_string(),
            value: "4".to_string(),
            offset: 114,
            len: 1,
        });
        root.children.push(leaf("TextBlock", 120, 20));

        root.rebase(40);
        assert_eq!(root.offset, 40);
        assert_eq!(root.attributes[0].offset, 54);
        assert_eq!(root.children[0].offset, 60);
    }

    #[test]
    fn test_rebase_backwards() {
        let mut root = leaf("Grid", 100, 10);
        root.rebase(10);
        assert_eq!(root.offset, 10);
    }
}

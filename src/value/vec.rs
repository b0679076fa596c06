use crate::value::CvValue;

/// Ordered list of values, as collected while matching a command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CvVec {
    values: Vec<CvValue>,
}

impl CvVec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cv: CvValue) {
        self.values.push(cv);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CvValue> {
        self.values.iter()
    }

    pub fn get(&self, i: usize) -> Option<&CvValue> {
        self.values.get(i)
    }

    /// First value with the given name.
    pub fn find(&self, name: &str) -> Option<&CvValue> {
        self.values.iter().find(|cv| cv.name() == Some(name))
    }

    /// Rendered text of the first value with the given name.
    pub fn find_str(&self, name: &str) -> Option<String> {
        self.find(name).map(|cv| cv.to_string())
    }

    /// Copy without keyword (constant command token) entries.
    pub fn without_keywords(&self) -> CvVec {
        self.values
            .iter()
            .filter(|cv| !cv.is_keyword())
            .cloned()
            .collect()
    }
}

impl FromIterator<CvValue> for CvVec {
    fn from_iter<I: IntoIterator<Item = CvValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CvVec {
    type Item = &'a CvValue;
    type IntoIter = std::slice::Iter<'a, CvValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{CvType, Value};

    #[test]
    fn keywords_excluded() {
        let mut vars = CvVec::new();
        vars.push(CvValue::keyword("show", "show"));
        vars.push(CvValue::from_value(Value::Uint16(8080)).named("port"));
        let plain = vars.without_keywords();
        assert_eq!(plain.len(), 1);
        assert_eq!(plain.find_str("port").as_deref(), Some("8080"));
        assert!(plain.find("show").is_none());
        assert_eq!(vars.find("show").map(|cv| cv.ty()), Some(CvType::String));
    }
}

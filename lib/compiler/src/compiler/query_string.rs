/// Ordered list of OData system query options.
///
/// Options with an empty value are skipped unless pushed with [`QueryOptionList::push_required`].
#[derive(Debug, Default)]
pub struct QueryOptionList {
    options: Vec<(&'static str, String)>,
}

impl QueryOptionList {
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.options.push((name, value));
        }
    }

    /// Pushes an option even when its value is empty.
    pub fn push_required(&mut self, name: &'static str, value: impl Into<String>) {
        self.options.push((name, value.into()));
    }

    pub fn push_joined(&mut self, name: &'static str, values: &[String]) {
        self.push(name, values.join(","));
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    fn join(&self, separator: &str) -> String {
        self.options
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `?$a=1&$b=2`, or an empty string when there are no options.
    pub fn to_url_query(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("?{}", self.join("&"))
        }
    }

    /// `$a=1;$b=2`, as used inside an `$expand` item.
    pub fn to_nested(&self) -> String {
        self.join(";")
    }
}

//! The component file wrapped around rendered markup.

/// File stem of every generated component.
pub const COMPONENT_ENTRY: &str = "index";

/// File extension of every generated component.
pub const COMPONENT_EXTENSION: &str = "vue";

/// `index.vue`
pub fn component_file_name() -> String {
    format!("{COMPONENT_ENTRY}.{COMPONENT_EXTENSION}")
}

/// Wrap rendered HTML in the fixed `<template><div>` shell.
pub fn wrap_component(html: &str) -> String {
    format!("<template>\n<div>\n{html}</div>\n</template>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_shape() {
        assert_eq!(
            wrap_component("<h1>Hi</h1>\n"),
            "<template>\n<div>\n<h1>Hi</h1>\n</div>\n</template>"
        );
    }

    #[test]
    fn file_name() {
        assert_eq!(component_file_name(), "index.vue");
    }
}

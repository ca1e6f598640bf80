//! Navigator settings

/// Tunables for a [`PanelNavigator`](crate::PanelNavigator)
///
/// # Example
///
/// ```
/// use panel_navigator::NavigatorSettings;
///
/// let settings = NavigatorSettings::new()
///     .horizontal_step(64.0)
///     .invalid_route("/not-found");
///
/// assert_eq!(settings.counter_param, "pc");
/// assert_eq!(settings.invalid_route, "/not-found");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorSettings {
    /// Horizontal shift per level of depth on wide viewports
    pub horizontal_step: f32,
    /// Vertical shift per level of depth on narrow viewports
    pub vertical_step: f32,
    /// Route navigated to when the panel URL is unrecoverable
    pub invalid_route: String,
    /// Matrix parameter used to tell reopened panels apart
    pub counter_param: String,
    /// Capacity of the match cache (`cache` feature)
    pub cache_capacity: usize,
}

impl NavigatorSettings {
    const DEFAULT_HORIZONTAL_STEP: f32 = 40.0;
    const DEFAULT_VERTICAL_STEP: f32 = 24.0;
    const DEFAULT_CACHE_CAPACITY: usize = 256;

    /// Default settings
    pub fn new() -> Self {
        Self {
            horizontal_step: Self::DEFAULT_HORIZONTAL_STEP,
            vertical_step: Self::DEFAULT_VERTICAL_STEP,
            invalid_route: "/invalid-url".to_string(),
            counter_param: "pc".to_string(),
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Set the horizontal step
    pub fn horizontal_step(mut self, step: f32) -> Self {
        self.horizontal_step = step;
        self
    }

    /// Set the vertical step
    pub fn vertical_step(mut self, step: f32) -> Self {
        self.vertical_step = step;
        self
    }

    /// Set the not-found route
    pub fn invalid_route(mut self, route: impl Into<String>) -> Self {
        self.invalid_route = route.into();
        self
    }

    /// Set the disambiguation parameter name
    pub fn counter_param(mut self, name: impl Into<String>) -> Self {
        self.counter_param = name.into();
        self
    }

    /// Set the match cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self::new()
    }
}

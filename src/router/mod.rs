use serde::Serialize;

/// Pages of the admin console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    Dashboard,
    DeviceList,
    Commands,
    Materials,
    Campaigns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
}

pub static ROUTES: [Route; 5] = [
    Route { path: "/", name: "Dashboard", view: View::Dashboard },
    Route { path: "/devices", name: "DeviceList", view: View::DeviceList },
    Route { path: "/commands", name: "Commands", view: View::Commands },
    Route { path: "/materials", name: "Materials", view: View::Materials },
    Route { path: "/campaigns", name: "Campaigns", view: View::Campaigns },
];

pub fn routes() -> impl Iterator<Item = &'static Route> {
    ROUTES.iter()
}

/// Match a location against the route table.
///
/// Query string and fragment are ignored, a single trailing slash is optional,
/// and matching is case-insensitive. Unknown paths resolve to `None`.
pub fn resolve(location: &str) -> Option<&'static Route> {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };

    ROUTES.iter().find(|route| route.path.eq_ignore_ascii_case(path))
}

pub fn by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}

pub fn path_for(view: View) -> &'static str {
    ROUTES
        .iter()
        .find(|route| route.view == view)
        .map(|route| route.path)
        .unwrap_or("/")
}

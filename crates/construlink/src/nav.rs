//! Screens, routes and the static content of the dashboard.

use std::fmt;

pub const APP_TITLE: &str = "ConstruLink";
pub const FOOTER: &str = "© 2024 Projeta. Todos os direitos reservados.";

/// A screen in the app.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Select,
    Notification,
    Profile,
    Form,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Select,
        Route::Notification,
        Route::Profile,
        Route::Form,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::Select => "/select",
            Route::Notification => "/notification",
            Route::Profile => "/profile",
            Route::Form => "/form",
        }
    }

    /// Look up a route by path. `/` maps to the home screen.
    pub fn from_path(path: &str) -> Option<Route> {
        if path == "/" {
            return Some(Route::Home);
        }
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Screen title.
    pub fn label(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Select => "Selecionar Empresa",
            Route::Notification => "Notificações",
            Route::Profile => "Perfil",
            Route::Form => "Relatório Diário de Obras",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the user between screens.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    history: Vec<Route>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn current(&self) -> Option<Route> {
        self.history.last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, route: Route) {
        self.history.push(route);
    }
}

/// A dashboard card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HomeCard {
    pub title: &'static str,
    pub description: &'static str,
    pub route: Route,
}

pub const HOME_CARDS: [HomeCard; 3] = [
    HomeCard {
        title: "Selecionar Empresa",
        description: "Escolha a empresa com a qual deseja trabalhar.",
        route: Route::Select,
    },
    HomeCard {
        title: "Notificações",
        description: "Veja as últimas atualizações e avisos.",
        route: Route::Notification,
    },
    HomeCard {
        title: "Relatório Diário de Obras",
        description: "Preencha o RDO do dia e gere o PDF.",
        route: Route::Form,
    },
];

/// A bottom navigation bar entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        label: "Home",
        route: Route::Home,
    },
    NavItem {
        label: "Empresa",
        route: Route::Select,
    },
    NavItem {
        label: "Notificações",
        route: Route::Notification,
    },
    NavItem {
        label: "Perfil",
        route: Route::Profile,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_for_every_route() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn nav_items_target_expected_routes() {
        let targets: Vec<&str> = NAV_ITEMS.iter().map(|i| i.route.path()).collect();
        assert_eq!(
            targets,
            ["/home", "/select", "/notification", "/profile"]
        );
    }

    #[test]
    fn home_cards_reach_select_notification_and_form() {
        let routes: Vec<Route> = HOME_CARDS.iter().map(|c| c.route).collect();
        assert_eq!(routes, [Route::Select, Route::Notification, Route::Form]);
    }

    #[test]
    fn recording_navigator_keeps_history() {
        let mut nav = RecordingNavigator::new();
        assert_eq!(nav.current(), None);
        nav.navigate(Route::Profile);
        nav.navigate(Route::Home);
        assert_eq!(nav.history(), &[Route::Profile, Route::Home]);
        assert_eq!(nav.current(), Some(Route::Home));
    }
}

use crate::config;
use crate::schema::association::Association;
use crate::schema::complaint::Complaint;
use crate::schema::event::Event;
use crate::schema::questionnaire::QuestionnaireResponse;
use crate::schema::room::Room;
use crate::schema::solution::Solution;
use crate::schema::user::User;
use crate::store::notifications::NotificationStore;
use crate::store::Collection;

/// Shared handle to every collection. Cloning is cheap; all clones see the
/// same store.
#[derive(Clone)]
pub struct AppState {
    pub users: Collection<User>,
    pub events: Collection<Event>,
    pub associations: Collection<Association>,
    pub complaints: Collection<Complaint>,
    pub rooms: Collection<Room>,
    pub questionnaires: Collection<QuestionnaireResponse>,
    pub solutions: Collection<Solution>,
    pub notifications: NotificationStore,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            users: Collection::new("user"),
            events: Collection::new("event"),
            associations: Collection::new("association"),
            complaints: Collection::new("complaint"),
            rooms: Collection::new("room"),
            questionnaires: Collection::new("questionnaire response"),
            solutions: Collection::new("solution"),
            notifications: NotificationStore::new(config::config().notifications.per_user_cap),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

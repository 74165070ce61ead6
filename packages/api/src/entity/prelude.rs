pub use super::door_count::Entity as DoorCount;
pub use super::line_item::Entity as LineItem;
pub use super::order::Entity as Order;

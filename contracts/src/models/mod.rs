//! Entity contracts
//!
//! One module per entity family. Each module carries the schema
//! accessors (`schema()`, `create_schema()`, ...) and the typed
//! projections deserialized from normalized output. All IDs are `i64`;
//! wire field names are camelCase.

pub mod menu;
pub mod order;
pub mod payment;
pub mod reservation;
pub mod table;
pub mod user;

// Schema accessors share names across modules, so only the projection
// types are re-exported here.
pub use menu::{
    DrinkItem, DrinkItemCreate, DrinkItemUpdate, DrinkSearch, FoodItem, FoodItemCreate,
    FoodItemUpdate, FoodSearch,
};
pub use order::{Order, OrderCreate, OrderItem, OrderItemCreate, OrderSearch, OrderUpdate};
pub use payment::{Payment, PaymentCreate, PaymentSearch, PaymentUpdate};
pub use reservation::{
    ConflictTable, Reservation, ReservationConflict, ReservationCreate, ReservationGuestUpdate,
    ReservationSearch, ReservationUpdate,
};
pub use table::{Table, TableAssignment, TableCreate, TableSearch, TableUpdate};
pub use user::{User, UserCreate, UserResponse, UserSearch, UserUpdate};

//! Closed domain value sets
//!
//! Every enum-typed contract field draws from one of these sets. Each
//! enum carries an [`EnumDef`] descriptor the schema engine matches
//! against, so adding a member is a local edit here; nothing else in
//! the crate changes shape.
//!
//! Wire strings are SCREAMING_SNAKE_CASE for domain values and the
//! literal column/order names for sort sets. Input is accepted
//! case-insensitively and normalized to the canonical string.

use serde::{Deserialize, Serialize};

/// Runtime descriptor of a closed domain set.
///
/// The schema engine validates enum-typed fields purely through this
/// descriptor; it never matches on concrete enum types.
#[derive(Debug, Clone, Copy)]
pub struct EnumDef {
    pub name: &'static str,
    pub variants: &'static [&'static str],
}

impl EnumDef {
    /// Canonical wire string for `input`, matched case-insensitively.
    pub fn canonical(&self, input: &str) -> Option<&'static str> {
        self.variants
            .iter()
            .copied()
            .find(|v| v.eq_ignore_ascii_case(input))
    }
}

macro_rules! domain_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Descriptor consumed by the schema engine.
            pub const DEF: EnumDef = EnumDef {
                name: stringify!($name),
                variants: &[$($wire),+],
            };

            /// Canonical wire string for this member.
            pub const fn as_str(&self) -> &'static str {
                match self { $( Self::$variant => $wire ),+ }
            }

            /// Case-insensitive lookup from loose input.
            pub fn from_input(input: &str) -> Option<Self> {
                $( if input.eq_ignore_ascii_case($wire) { return Some(Self::$variant); } )+
                None
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

domain_enum! {
    /// Staff role
    pub enum Role {
        Admin => "ADMIN",
        Manager => "MANAGER",
        Server => "SERVER",
        Chef => "CHEF",
        Bartender => "BARTENDER",
        Host => "HOST",
    }
}

domain_enum! {
    /// Order lifecycle status
    ///
    /// Normal progression is AWAITING → RECEIVED → SERVED → READY_TO_PAY
    /// → COMPLETED, with CANCELED and DISPUTED as side exits. This layer
    /// validates membership only; transition legality is enforced by the
    /// order service.
    pub enum OrderStatus {
        Awaiting => "AWAITING",
        Received => "RECEIVED",
        Served => "SERVED",
        ReadyToPay => "READY_TO_PAY",
        Completed => "COMPLETED",
        Canceled => "CANCELED",
        Disputed => "DISPUTED",
    }
}

domain_enum! {
    /// Payment lifecycle status (shared by payments and order items)
    pub enum PaymentStatus {
        Pending => "PENDING",
        Completed => "COMPLETED",
        Failed => "FAILED",
        Refunded => "REFUNDED",
        Canceled => "CANCELED",
    }
}

domain_enum! {
    /// Payment method
    pub enum PaymentMethod {
        Cash => "CASH",
        CreditCard => "CREDIT_CARD",
        DebitCard => "DEBIT_CARD",
        MobilePayment => "MOBILE_PAYMENT",
        GiftCard => "GIFT_CARD",
    }
}

domain_enum! {
    /// Food menu section
    pub enum FoodCategory {
        Appetizer => "APPETIZER",
        Soup => "SOUP",
        Salad => "SALAD",
        MainCourse => "MAIN_COURSE",
        Side => "SIDE",
        Dessert => "DESSERT",
    }
}

domain_enum! {
    /// Food preparation type
    pub enum FoodType {
        Meat => "MEAT",
        Poultry => "POULTRY",
        Seafood => "SEAFOOD",
        Pasta => "PASTA",
        Pizza => "PIZZA",
        Vegetarian => "VEGETARIAN",
    }
}

domain_enum! {
    /// Drink menu section
    pub enum DrinkCategory {
        Water => "WATER",
        SoftDrink => "SOFT_DRINK",
        Juice => "JUICE",
        Coffee => "COFFEE",
        Tea => "TEA",
        Beer => "BEER",
        Wine => "WINE",
        Cocktail => "COCKTAIL",
        Spirit => "SPIRIT",
    }
}

domain_enum! {
    /// Drink serving temperature
    pub enum ServingTemperature {
        Cold => "COLD",
        RoomTemperature => "ROOM_TEMPERATURE",
        Hot => "HOT",
    }
}

domain_enum! {
    /// Declared allergen
    pub enum Allergy {
        Gluten => "GLUTEN",
        Dairy => "DAIRY",
        Eggs => "EGGS",
        Fish => "FISH",
        Shellfish => "SHELLFISH",
        Nuts => "NUTS",
        Peanuts => "PEANUTS",
        Soy => "SOY",
        Sesame => "SESAME",
        Celery => "CELERY",
        Mustard => "MUSTARD",
        Sulphites => "SULPHITES",
    }
}

domain_enum! {
    /// Physical table condition
    pub enum TableCondition {
        Available => "AVAILABLE",
        Occupied => "OCCUPIED",
        Reserved => "RESERVED",
        NeedsCleaning => "NEEDS_CLEANING",
        OutOfService => "OUT_OF_SERVICE",
    }
}

domain_enum! {
    /// Reservation lifecycle status
    pub enum ReservationStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Seated => "SEATED",
        Completed => "COMPLETED",
        Canceled => "CANCELED",
        NoShow => "NO_SHOW",
    }
}

domain_enum! {
    /// Sort direction for search queries
    pub enum SortOrder {
        Asc => "asc",
        Desc => "desc",
    }
}

// ==================== Sortable column sets ====================

domain_enum! {
    pub enum UserSortBy {
        Id => "id",
        Name => "name",
        Email => "email",
        Role => "role",
        CreatedAt => "createdAt",
    }
}

domain_enum! {
    pub enum OrderSortBy {
        Id => "id",
        OrderNumber => "orderNumber",
        OrderTime => "orderTime",
        TotalAmount => "totalAmount",
        Status => "status",
    }
}

domain_enum! {
    pub enum PaymentSortBy {
        Id => "id",
        Amount => "amount",
        Method => "method",
        Status => "status",
        CreatedAt => "createdAt",
    }
}

domain_enum! {
    pub enum TableSortBy {
        Id => "id",
        Number => "number",
        Capacity => "capacity",
        Condition => "condition",
    }
}

domain_enum! {
    pub enum FoodSortBy {
        Id => "id",
        Name => "name",
        Price => "price",
        Category => "category",
        PreparationTime => "preparationTime",
    }
}

domain_enum! {
    pub enum DrinkSortBy {
        Id => "id",
        Name => "name",
        Price => "price",
        Category => "category",
        Volume => "volume",
    }
}

domain_enum! {
    pub enum ReservationSortBy {
        Id => "id",
        Time => "time",
        GuestsCount => "guestsCount",
        Status => "status",
        CreatedAt => "createdAt",
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Awaiting
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for TableCondition {
    fn default() -> Self {
        Self::Available
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::Asc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_lookup_is_case_insensitive() {
        assert_eq!(Role::DEF.canonical("admin"), Some("ADMIN"));
        assert_eq!(Role::DEF.canonical("Admin"), Some("ADMIN"));
        assert_eq!(Role::DEF.canonical("ADMIN"), Some("ADMIN"));
        assert_eq!(Role::DEF.canonical("root"), None);
    }

    #[test]
    fn test_sort_order_keeps_lowercase_canon() {
        assert_eq!(SortOrder::DEF.canonical("ASC"), Some("asc"));
        assert_eq!(SortOrder::Asc.as_str(), "asc");
    }

    #[test]
    fn test_from_input() {
        assert_eq!(OrderStatus::from_input("ready_to_pay"), Some(OrderStatus::ReadyToPay));
        assert_eq!(OrderStatus::from_input("SERVED"), Some(OrderStatus::Served));
        assert_eq!(OrderStatus::from_input("UNKNOWN"), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&PaymentMethod::CreditCard).unwrap();
        assert_eq!(json, "\"CREDIT_CARD\"");
        let back: PaymentMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PaymentMethod::CreditCard);
    }

    #[test]
    fn test_def_lists_every_variant() {
        assert_eq!(OrderStatus::DEF.variants.len(), 7);
        assert!(OrderStatus::DEF.variants.contains(&"READY_TO_PAY"));
        assert_eq!(Allergy::DEF.name, "Allergy");
    }

    #[test]
    fn test_display_uses_wire_string() {
        assert_eq!(ReservationStatus::NoShow.to_string(), "NO_SHOW");
        assert_eq!(UserSortBy::CreatedAt.to_string(), "createdAt");
    }
}

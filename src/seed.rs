//! Built-in sample records served by the mock data source.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{
    ChartData, ChartPoint, Comment, CommentStatus, Destination, DestinationCategory, Package, PackageType, Payment,
    PaymentStatus, Permission, Provider, RecordId, Reservation, ReservationStatus, Role, Tourist, User, UserStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap_or_default()
}

const PLACEHOLDER_IMAGE: &str = "https://turismoapp.com/placeholder.svg";

pub fn users() -> Vec<User> {
    let user = |id: u64, name: &str, email: &str, role: &str, status, created_at| User {
        id: RecordId(id),
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        status,
        created_at,
    };
    vec![
        user(1, "Juan Pérez", "juan@ejemplo.com", "Admin", UserStatus::Active, date(2024, 1, 15)),
        user(2, "María García", "maria@ejemplo.com", "User", UserStatus::Active, date(2024, 1, 20)),
        user(3, "Carlos López", "carlos@ejemplo.com", "Moderator", UserStatus::Inactive, date(2024, 2, 1)),
    ]
}

pub fn tourists() -> Vec<Tourist> {
    #[allow(clippy::too_many_arguments)]
    fn tourist(
        id: u64,
        first: &str,
        last: &str,
        email: &str,
        phone: &str,
        country: &str,
        birth: NaiveDate,
        document: &str,
        user_id: Option<u64>,
        created_at: NaiveDate,
    ) -> Tourist {
        Tourist {
            id: RecordId(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            country: country.to_string(),
            birth_date: birth,
            document: document.to_string(),
            user_id: user_id.map(RecordId),
            created_at,
        }
    }
    vec![
        tourist(
            1,
            "Ana",
            "Martínez",
            "ana@ejemplo.com",
            "+52 555 1234",
            "México",
            date(1990, 5, 15),
            "CURP123456",
            Some(1),
            date(2024, 1, 15),
        ),
        tourist(
            2,
            "John",
            "Smith",
            "john@example.com",
            "+1 555 5678",
            "USA",
            date(1985, 8, 22),
            "SSN987654",
            Some(2),
            date(2024, 1, 20),
        ),
        tourist(
            3,
            "María",
            "García",
            "maria@ejemplo.com",
            "+34 600 123 456",
            "España",
            date(1992, 11, 3),
            "DNI4455667",
            Some(2),
            date(2024, 2, 1),
        ),
        tourist(
            4,
            "Carlos",
            "López",
            "carlos@ejemplo.com",
            "+52 555 9876",
            "México",
            date(1978, 2, 9),
            "CURP654321",
            Some(3),
            date(2024, 1, 18),
        ),
        tourist(
            5,
            "Laura",
            "Rodríguez",
            "laura@ejemplo.com",
            "+57 310 555 0101",
            "Colombia",
            date(1995, 7, 30),
            "CC10203040",
            None,
            date(2024, 1, 22),
        ),
    ]
}

pub fn categories() -> Vec<DestinationCategory> {
    ["Beach", "Mountain", "City", "Adventure"]
        .iter()
        .zip(1..)
        .map(|(name, id)| DestinationCategory {
            id: RecordId(id),
            name: name.to_string(),
        })
        .collect()
}

pub fn package_types() -> Vec<PackageType> {
    ["All Inclusive", "Adventure", "Cultural", "Romantic", "Family"]
        .iter()
        .zip(1..)
        .map(|(name, id)| PackageType {
            id: RecordId(id),
            name: name.to_string(),
        })
        .collect()
}

pub fn destinations() -> Vec<Destination> {
    let destination = |id: u64, name: &str, description: &str, country: &str, city: &str, category: u64, price| {
        Destination {
            id: RecordId(id),
            name: name.to_string(),
            description: description.to_string(),
            country: country.to_string(),
            city: city.to_string(),
            category_id: RecordId(category),
            base_price: price,
            image_url: PLACEHOLDER_IMAGE.to_string(),
            active: true,
            created_at: date(2024, 1, 14 + id as u32),
        }
    };
    vec![
        destination(1, "Cancún", "Beautiful beaches of the Mexican Caribbean", "México", "Cancún", 1, 1500.0),
        destination(2, "Machu Picchu", "Ancient Inca citadel in the Andes", "Perú", "Cusco", 2, 2000.0),
        destination(3, "París", "The city of light", "Francia", "París", 3, 2800.0),
        destination(4, "Tokio", "Tradition and neon in equal measure", "Japón", "Tokio", 3, 3200.0),
    ]
}

pub fn packages() -> Vec<Package> {
    vec![
        Package {
            id: RecordId(1),
            name: "Cancún Paradise".to_string(),
            description: "The best beaches of the Mexican Caribbean".to_string(),
            package_type_id: RecordId(1),
            destination_id: RecordId(1),
            price: 1500.0,
            duration_days: 7,
            max_people: 4,
            includes: "5-star hotel, Meals, Drinks, Water activities".to_string(),
            excludes: "Flights, Travel insurance, Tips".to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            active: true,
            rating: 4.8,
            reservations_count: 45,
            created_at: date(2024, 1, 15),
        },
        Package {
            id: RecordId(2),
            name: "Aventura Inca".to_string(),
            description: "Explore the majestic citadel of Machu Picchu".to_string(),
            package_type_id: RecordId(2),
            destination_id: RecordId(2),
            price: 2200.0,
            duration_days: 5,
            max_people: 8,
            includes: "Specialist guide, Transport, Lodging, Breakfasts".to_string(),
            excludes: "Flights, Lunch, Dinner, Trekking gear".to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            active: true,
            rating: 4.9,
            reservations_count: 32,
            created_at: date(2024, 1, 20),
        },
        Package {
            id: RecordId(3),
            name: "París Romántico".to_string(),
            description: "The city of love awaits".to_string(),
            package_type_id: RecordId(4),
            destination_id: RecordId(3),
            price: 3500.0,
            duration_days: 6,
            max_people: 2,
            includes: "Boutique hotel, Romantic dinner, City tour".to_string(),
            excludes: "Flights, Extra meals, Museum tickets".to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            active: true,
            rating: 4.7,
            reservations_count: 28,
            created_at: date(2024, 2, 1),
        },
    ]
}

pub fn reservations() -> Vec<Reservation> {
    #[allow(clippy::too_many_arguments)]
    fn reservation(
        id: u64,
        tourist: u64,
        package: u64,
        start: NaiveDate,
        end: NaiveDate,
        people: u32,
        total: f64,
        status: ReservationStatus,
        method: &str,
        notes: &str,
        created_at: NaiveDate,
    ) -> Reservation {
        Reservation {
            id: RecordId(id),
            code: Reservation::code_for(RecordId(id), created_at),
            tourist_id: RecordId(tourist),
            package_id: RecordId(package),
            start_date: start,
            end_date: end,
            people,
            total_price: total,
            status,
            payment_method: method.to_string(),
            notes: notes.to_string(),
            created_at,
        }
    }
    vec![
        reservation(
            1,
            1,
            1,
            date(2024, 3, 15),
            date(2024, 3, 22),
            2,
            3000.0,
            ReservationStatus::Confirmed,
            "Credit Card",
            "Requests a sea-view room",
            date(2024, 1, 15),
        ),
        reservation(
            2,
            2,
            2,
            date(2024, 4, 10),
            date(2024, 4, 15),
            4,
            8800.0,
            ReservationStatus::Pending,
            "Bank Transfer",
            "Family group with children",
            date(2024, 2, 1),
        ),
        reservation(
            3,
            3,
            3,
            date(2024, 5, 20),
            date(2024, 5, 26),
            2,
            7000.0,
            ReservationStatus::Confirmed,
            "PayPal",
            "Honeymoon",
            date(2024, 2, 10),
        ),
        reservation(
            4,
            4,
            1,
            date(2024, 2, 28),
            date(2024, 3, 7),
            3,
            4500.0,
            ReservationStatus::Completed,
            "Debit Card",
            "",
            date(2024, 1, 20),
        ),
        reservation(
            5,
            5,
            2,
            date(2024, 3, 1),
            date(2024, 3, 6),
            1,
            2500.0,
            ReservationStatus::Cancelled,
            "Credit Card",
            "Cancelled for medical reasons",
            date(2024, 1, 25),
        ),
    ]
}

pub fn payments() -> Vec<Payment> {
    #[allow(clippy::too_many_arguments)]
    fn payment(
        id: u64,
        amount: f64,
        method: &str,
        status: PaymentStatus,
        paid_at: NaiveDateTime,
        reference: &str,
        commission: f64,
        net: f64,
        notes: &str,
    ) -> Payment {
        Payment {
            id: RecordId(id),
            reservation_id: RecordId(id),
            amount,
            method: method.to_string(),
            status,
            paid_at,
            external_reference: reference.to_string(),
            commission,
            net_amount: net,
            currency: "USD".to_string(),
            notes: notes.to_string(),
            created_at: paid_at.date(),
        }
    }
    vec![
        payment(
            1,
            3000.0,
            "Credit Card",
            PaymentStatus::Completed,
            datetime(2024, 1, 15, 10, 30),
            "TXN_123456789",
            90.0,
            2910.0,
            "Processed successfully",
        ),
        payment(
            2,
            8800.0,
            "Bank Transfer",
            PaymentStatus::Pending,
            datetime(2024, 2, 1, 14, 15),
            "WIRE_987654321",
            44.0,
            8756.0,
            "Awaiting bank confirmation",
        ),
        payment(
            3,
            7000.0,
            "PayPal",
            PaymentStatus::Completed,
            datetime(2024, 2, 10, 16, 45),
            "PP_ABCDEF123",
            210.0,
            6790.0,
            "Instant PayPal payment",
        ),
        payment(
            4,
            4500.0,
            "Debit Card",
            PaymentStatus::Failed,
            datetime(2024, 1, 20, 9, 20),
            "FAIL_555666777",
            0.0,
            0.0,
            "Insufficient funds",
        ),
        payment(
            5,
            2500.0,
            "Credit Card",
            PaymentStatus::Refunded,
            datetime(2024, 1, 25, 11, 0),
            "REF_888999000",
            -75.0,
            2425.0,
            "Refund after cancellation",
        ),
    ]
}

pub fn providers() -> Vec<Provider> {
    #[allow(clippy::too_many_arguments)]
    fn provider(
        id: u64,
        name: &str,
        service_type: &str,
        contact: (&str, &str, &str),
        address: &str,
        city: &str,
        country: &str,
        website: &str,
        description: &str,
        rating: f64,
        active_services: u32,
        active: bool,
        created_at: NaiveDate,
    ) -> Provider {
        Provider {
            id: RecordId(id),
            name: name.to_string(),
            service_type: service_type.to_string(),
            contact_name: contact.0.to_string(),
            contact_email: contact.1.to_string(),
            contact_phone: contact.2.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            website: website.to_string(),
            description: description.to_string(),
            rating,
            active_services,
            active,
            created_at,
        }
    }
    vec![
        provider(
            1,
            "Hotel Paradise Resort",
            "Lodging",
            ("Ana García", "ana@paradiseresort.com", "+52 998 123 4567"),
            "Zona Hotelera Km 14.5",
            "Cancún",
            "México",
            "https://paradiseresort.com",
            "Beachfront all-inclusive resort with 500 rooms",
            4.8,
            12,
            true,
            date(2024, 1, 15),
        ),
        provider(
            2,
            "Aventuras Inca Tours",
            "Tours & Excursions",
            ("Carlos Mendoza", "carlos@incatours.pe", "+51 84 234 5678"),
            "Av. El Sol 123",
            "Cusco",
            "Perú",
            "https://incatours.pe",
            "Machu Picchu and Sacred Valley specialists",
            4.9,
            8,
            true,
            date(2024, 1, 20),
        ),
        provider(
            3,
            "TransCorp Shuttle",
            "Transport",
            ("Miguel Rodríguez", "miguel@transcorp.com", "+1 555 345 6789"),
            "Airport Terminal 2",
            "Miami",
            "Estados Unidos",
            "https://transcorp.com",
            "Airport shuttles and transfers",
            4.5,
            15,
            true,
            date(2024, 2, 1),
        ),
        provider(
            4,
            "Gourmet Catering Paris",
            "Food & Dining",
            ("Sophie Laurent", "sophie@gourmetparis.fr", "+33 1 45 67 89 01"),
            "Rue de Rivoli 45",
            "París",
            "Francia",
            "https://gourmetparis.fr",
            "Gourmet catering for special events",
            4.7,
            6,
            false,
            date(2024, 2, 10),
        ),
    ]
}

pub fn comments() -> Vec<Comment> {
    #[allow(clippy::too_many_arguments)]
    fn comment(
        id: u64,
        package: u64,
        rating: u8,
        title: &str,
        body: &str,
        status: CommentStatus,
        trip_date: NaiveDate,
        helpful: (u32, u32),
        reply: &str,
        created_at: NaiveDate,
    ) -> Comment {
        Comment {
            id: RecordId(id),
            tourist_id: RecordId(id),
            package_id: RecordId(package),
            rating,
            title: title.to_string(),
            body: body.to_string(),
            status,
            trip_date,
            helpful_yes: helpful.0,
            helpful_no: helpful.1,
            admin_reply: reply.to_string(),
            created_at,
        }
    }
    vec![
        comment(
            1,
            1,
            5,
            "Incredible experience",
            "The hotel was spectacular, the food delicious and the staff very friendly. The water activities were the highlight of the trip.",
            CommentStatus::Approved,
            date(2024, 1, 15),
            (12, 1),
            "Thank you for your review! We are glad you enjoyed your stay.",
            date(2024, 1, 20),
        ),
        comment(
            2,
            2,
            4,
            "Very good experience",
            "The Machu Picchu tour was amazing even though the weather did not help. The guide knew the history very well.",
            CommentStatus::Approved,
            date(2024, 2, 1),
            (8, 0),
            "",
            date(2024, 2, 5),
        ),
        comment(
            3,
            3,
            3,
            "Could be better",
            "The hotel was well located but the rooms need renovation. The romantic dinner was disappointing.",
            CommentStatus::Pending,
            date(2024, 2, 10),
            (3, 5),
            "",
            date(2024, 2, 15),
        ),
        comment(
            4,
            1,
            2,
            "Did not meet expectations",
            "Service was very slow, the food was not fresh and the facilities were dirty. Not recommended for families.",
            CommentStatus::Rejected,
            date(2024, 1, 25),
            (1, 8),
            "We are sorry about your experience. We have taken steps to improve our service.",
            date(2024, 1, 30),
        ),
        comment(
            5,
            2,
            5,
            "Spectacular!",
            "A once in a lifetime experience. Sunrise at Machu Picchu was magical. The whole team was professional and attentive.",
            CommentStatus::Pending,
            date(2024, 2, 20),
            (15, 0),
            "",
            date(2024, 2, 25),
        ),
    ]
}

pub fn permissions() -> Vec<Permission> {
    [
        ("users.view", "View users", "Users"),
        ("users.create", "Create users", "Users"),
        ("users.edit", "Edit users", "Users"),
        ("users.delete", "Delete users", "Users"),
        ("destinations.view", "View destinations", "Destinations"),
        ("destinations.create", "Create destinations", "Destinations"),
        ("reservations.view", "View reservations", "Reservations"),
        ("reports.view", "View reports", "Reports"),
    ]
    .iter()
    .zip(1..)
    .map(|((name, description, module), id)| Permission {
        id: RecordId(id),
        name: name.to_string(),
        description: description.to_string(),
        module: module.to_string(),
    })
    .collect()
}

pub fn roles() -> Vec<Role> {
    vec![
        Role {
            id: RecordId(1),
            name: "Administrator".to_string(),
            description: "Full system access".to_string(),
            active: true,
            users_count: 2,
            permissions: (1..=8).map(RecordId).collect(),
            created_at: date(2024, 1, 15),
        },
        Role {
            id: RecordId(2),
            name: "Moderator".to_string(),
            description: "Content management and basic user administration".to_string(),
            active: true,
            users_count: 5,
            permissions: vec![RecordId(1), RecordId(5), RecordId(7)],
            created_at: date(2024, 1, 20),
        },
    ]
}

pub fn charts() -> ChartData {
    ChartData {
        monthly_reservations: [("Jan", 65.0), ("Feb", 78.0), ("Mar", 90.0), ("Apr", 81.0), ("May", 95.0), ("Jun", 110.0)]
            .iter()
            .map(|(label, value)| ChartPoint::new(*label, *value))
            .collect(),
        tourists_by_country: [("México", 35.0), ("USA", 25.0), ("Canadá", 20.0), ("España", 12.0), ("Others", 8.0)]
            .iter()
            .map(|(label, value)| ChartPoint::new(*label, *value))
            .collect(),
        revenue_by_package: [("Beach", 45000.0), ("Mountain", 32000.0), ("City", 28000.0), ("Adventure", 20000.0)]
            .iter()
            .map(|(label, value)| ChartPoint::new(*label, *value))
            .collect(),
    }
}

//! Application services: the operations behind the HTTP routes, wired onto
//! the infra dispatchers and repositories.

use std::sync::{Arc, RwLock};

use chrono::{Datelike, Utc};

use laundrydesk_catalog::{
    Category, CategoryCommand, CategoryStatus, CreateCategory, DeleteCategory, Item,
    UpdateCategory, count_items_referencing, ensure_unique_code, search_categories,
};
use laundrydesk_core::{CategoryId, DomainError, ItemId, LogEntryId, OrderId, ServiceId, UserId};
use laundrydesk_infra::{
    CommandDispatcher, DispatchError, ExportError, ExportFormat, ImageError, ImageStore,
    ImportError, ImportReport, InMemoryRepository, Repository, RepositoryError, StoredImage, export,
    import,
    seed::{self, SeedReport},
};
use laundrydesk_invoicing::{EditInvoice, InvoiceEntry, InvoiceFilter, InvoiceOverrides, aggregate};
use laundrydesk_laundry::{
    DeleteOrder, GuestLaundryOrder, LaundryItem, LaundryService, OrderCommand, OrderDetails,
    OrderFilter, OrderStats, OrderStatus, PlaceOrder, UpdateOrderStatus, next_order_sequence,
    order_number,
};
use laundrydesk_logbook::{
    AddLogEntry, DeleteLogEntry, EditLogEntry, LogEntry, LogEntryCommand, Quantities, RecordReturn,
};

type CategoryDispatcher = CommandDispatcher<Category, Arc<InMemoryRepository<CategoryId, Category>>>;
type LogEntryDispatcher = CommandDispatcher<LogEntry, Arc<InMemoryRepository<LogEntryId, LogEntry>>>;
type OrderDispatcher =
    CommandDispatcher<GuestLaundryOrder, Arc<InMemoryRepository<OrderId, GuestLaundryOrder>>>;

/// Fields of a category form.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// One requested line of a guest order.
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub service_id: ServiceId,
    pub quantity: u32,
    pub service_type: Option<String>,
}

pub struct AppServices {
    categories: CategoryDispatcher,
    items: Arc<InMemoryRepository<ItemId, Item>>,
    log_entries: LogEntryDispatcher,
    invoice_overrides: RwLock<InvoiceOverrides>,
    laundry_services: Arc<InMemoryRepository<ServiceId, LaundryService>>,
    orders: OrderDispatcher,
    images: ImageStore,
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new()
    }
}

impl AppServices {
    /// Empty in-memory services.
    pub fn new() -> Self {
        Self {
            categories: CommandDispatcher::new("catalog.category", Arc::new(InMemoryRepository::new())),
            items: Arc::new(InMemoryRepository::new()),
            log_entries: CommandDispatcher::new("logbook.entry", Arc::new(InMemoryRepository::new())),
            invoice_overrides: RwLock::new(InvoiceOverrides::new()),
            laundry_services: Arc::new(InMemoryRepository::new()),
            orders: CommandDispatcher::new("laundry.order", Arc::new(InMemoryRepository::new())),
            images: ImageStore::new(),
        }
    }

    /// Load the sample data set. Orders are attributed to `created_by`.
    pub fn seed_sample_data(&self, created_by: UserId) -> Result<SeedReport, DispatchError> {
        let report = SeedReport {
            categories: seed::seed_categories(&self.categories)?,
            items: seed::seed_items(&self.items)?,
            log_entries: seed::seed_log_entries(&self.log_entries)?,
            services: seed::seed_services(&self.laundry_services)?,
            orders: seed::seed_orders(&self.orders, &self.laundry_services.list(), created_by)?,
        };
        tracing::info!(
            categories = report.categories,
            items = report.items,
            log_entries = report.log_entries,
            services = report.services,
            orders = report.orders,
            "sample data loaded"
        );
        Ok(report)
    }

    // ---- categories -------------------------------------------------------

    pub fn list_categories(&self, search: Option<&str>) -> Vec<Category> {
        let all = self.categories.repository().list();
        match search {
            Some(term) => search_categories(&all, term).into_iter().cloned().collect(),
            None => all,
        }
    }

    pub fn get_category(&self, id: CategoryId) -> Option<Category> {
        self.categories.repository().get(&id)
    }

    /// Number of items whose category is `category`'s name.
    pub fn category_item_count(&self, category: &Category) -> usize {
        count_items_referencing(&self.items.list(), category.name())
    }

    pub fn create_category(&self, input: CategoryInput) -> Result<Category, DispatchError> {
        let committed = self.categories.create(Category::empty, |id, all| {
            ensure_unique_code(all, &input.code, None)?;
            Ok(CategoryCommand::CreateCategory(CreateCategory {
                category_id: id,
                code: input.code.clone(),
                name: input.name.clone(),
                description: input.description.clone(),
                occurred_at: Utc::now(),
            }))
        })?;
        Ok(committed.aggregate)
    }

    /// Update a category; `status` keeps the current one when `None`.
    pub fn update_category(
        &self,
        id: CategoryId,
        input: CategoryInput,
        status: Option<CategoryStatus>,
    ) -> Result<Category, DispatchError> {
        let committed = self.categories.dispatch_with(id, |current, all| {
            ensure_unique_code(all, &input.code, Some(id))?;
            Ok(CategoryCommand::UpdateCategory(UpdateCategory {
                category_id: id,
                code: input.code.clone(),
                name: input.name.clone(),
                description: input.description.clone(),
                status: status.unwrap_or(current.status()),
                occurred_at: Utc::now(),
            }))
        })?;
        Ok(committed.aggregate)
    }

    pub fn delete_category(&self, id: CategoryId) -> Result<(), DispatchError> {
        let items = self.items.list();
        self.categories.dispatch_with(id, |current, _| {
            Ok(CategoryCommand::DeleteCategory(DeleteCategory {
                category_id: id,
                referencing_items: count_items_referencing(&items, current.name()),
                occurred_at: Utc::now(),
            }))
        })?;
        Ok(())
    }

    pub fn export_categories_csv(&self) -> Result<Vec<u8>, ExportError> {
        export::categories_csv(&self.categories.repository().list())
    }

    /// Import a category CSV document row by row.
    pub fn import_categories(&self, content: &[u8]) -> Result<ImportReport, ImportError> {
        let rows = import::parse_category_csv(content).inspect_err(|e| {
            tracing::warn!(error = %e, "category import rejected");
        })?;

        let report = import::import_rows(&rows, |row| {
            self.create_category(CategoryInput {
                code: row.code.clone(),
                name: row.name.clone(),
                description: row.description.clone(),
            })
            .map(|_| ())
        });

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "category import finished"
        );
        Ok(report)
    }

    // ---- items ------------------------------------------------------------

    pub fn list_items(&self) -> Vec<Item> {
        self.items.list()
    }

    // ---- log book ---------------------------------------------------------

    pub fn list_log_entries(&self) -> Vec<LogEntry> {
        self.log_entries.repository().list()
    }

    pub fn get_log_entry(&self, id: LogEntryId) -> Option<LogEntry> {
        self.log_entries.repository().get(&id)
    }

    pub fn add_log_entry(
        &self,
        date: String,
        item_id: ItemId,
        quantities: Quantities,
    ) -> Result<LogEntry, DispatchError> {
        let committed = self.log_entries.create(LogEntry::empty, |id, _| {
            Ok(LogEntryCommand::AddLogEntry(AddLogEntry {
                entry_id: id,
                date,
                item_id,
                quantities,
                occurred_at: Utc::now(),
            }))
        })?;
        Ok(committed.aggregate)
    }

    pub fn edit_log_entry(
        &self,
        id: LogEntryId,
        date: String,
        item_id: ItemId,
        quantities: Quantities,
    ) -> Result<LogEntry, DispatchError> {
        let committed = self.log_entries.dispatch(
            id,
            LogEntryCommand::EditLogEntry(EditLogEntry {
                entry_id: id,
                date,
                item_id,
                quantities,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(committed.aggregate)
    }

    pub fn record_return(
        &self,
        id: LogEntryId,
        quantity: u32,
        image_url: Option<String>,
    ) -> Result<LogEntry, DispatchError> {
        let image_url = image_url.filter(|u| !u.trim().is_empty());
        if let Some(url) = image_url.as_deref() {
            if self.images.get(url.trim()).is_none() {
                return Err(DispatchError::Validation(format!(
                    "image '{url}' does not refer to an uploaded image"
                )));
            }
        }

        let committed = self.log_entries.dispatch(
            id,
            LogEntryCommand::RecordReturn(RecordReturn {
                entry_id: id,
                quantity,
                image_url,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(committed.aggregate)
    }

    pub fn delete_log_entry(&self, id: LogEntryId) -> Result<(), DispatchError> {
        self.log_entries.dispatch(
            id,
            LogEntryCommand::DeleteLogEntry(DeleteLogEntry {
                entry_id: id,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(())
    }

    // ---- invoices ---------------------------------------------------------

    /// Invoices recomputed from the log book, with manual edits laid over.
    fn current_invoices(&self, overrides: &InvoiceOverrides) -> Vec<InvoiceEntry> {
        let generated = aggregate(&self.log_entries.repository().list(), &self.items.list());
        overrides.merge(generated)
    }

    pub fn list_invoices(&self, filter: &InvoiceFilter) -> Result<Vec<InvoiceEntry>, DispatchError> {
        let overrides = self
            .invoice_overrides
            .read()
            .map_err(|_| RepositoryError::Poisoned)?;
        Ok(filter.apply(&self.current_invoices(&overrides)))
    }

    pub fn edit_invoice(&self, edit: EditInvoice) -> Result<InvoiceEntry, DispatchError> {
        let mut overrides = self
            .invoice_overrides
            .write()
            .map_err(|_| RepositoryError::Poisoned)?;
        let current = self.current_invoices(&overrides);
        let pickup_date = edit.pickup_date.clone();
        let updated = overrides.edit(&current, edit)?;

        tracing::info!(
            pickup_date = %pickup_date,
            invoice_no = %updated.invoice_no,
            "invoice edited"
        );
        Ok(updated)
    }

    pub fn export_invoices(
        &self,
        format: ExportFormat,
        filter: &InvoiceFilter,
    ) -> Result<Vec<u8>, ApiExportError> {
        let invoices = self.list_invoices(filter)?;
        Ok(export::export_invoices(format, &invoices)?)
    }

    // ---- guest laundry ----------------------------------------------------

    pub fn list_laundry_services(&self) -> Vec<LaundryService> {
        self.laundry_services.list()
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> Vec<GuestLaundryOrder> {
        let all = self.orders.repository().list();
        filter.apply(&all).into_iter().cloned().collect()
    }

    pub fn get_order(&self, id: OrderId) -> Option<GuestLaundryOrder> {
        self.orders.repository().get(&id)
    }

    pub fn order_stats(&self) -> OrderStats {
        OrderStats::compute(&self.orders.repository().list())
    }

    /// Price the requested lines and place the order.
    pub fn place_order(
        &self,
        details: OrderDetails,
        lines: Vec<OrderLineInput>,
        created_by: UserId,
    ) -> Result<GuestLaundryOrder, DispatchError> {
        let items = self.price_lines(&details, &lines)?;
        let now = Utc::now();

        let committed = self.orders.create(GuestLaundryOrder::empty, |id, existing| {
            Ok(OrderCommand::PlaceOrder(PlaceOrder {
                order_id: id,
                order_number: order_number(now.year(), next_order_sequence(existing)),
                details,
                items,
                created_by,
                occurred_at: now,
            }))
        })?;
        Ok(committed.aggregate)
    }

    fn price_lines(
        &self,
        details: &OrderDetails,
        lines: &[OrderLineInput],
    ) -> Result<Vec<LaundryItem>, DomainError> {
        lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let service = self.laundry_services.get(&line.service_id).ok_or_else(|| {
                    DomainError::validation(format!("unknown laundry service {}", line.service_id))
                })?;
                service.line_item(
                    idx as u64 + 1,
                    line.quantity,
                    details.priority,
                    line.service_type.as_deref(),
                )
            })
            .collect()
    }

    pub fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<GuestLaundryOrder, DispatchError> {
        let committed = self.orders.dispatch(
            id,
            OrderCommand::UpdateOrderStatus(UpdateOrderStatus {
                order_id: id,
                status,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(committed.aggregate)
    }

    pub fn delete_order(&self, id: OrderId) -> Result<(), DispatchError> {
        self.orders.dispatch(
            id,
            OrderCommand::DeleteOrder(DeleteOrder {
                order_id: id,
                occurred_at: Utc::now(),
            }),
        )?;
        Ok(())
    }

    // ---- uploads ----------------------------------------------------------

    pub fn upload_image(&self, content_type: &str, bytes: Vec<u8>) -> Result<String, ImageError> {
        self.images.upload(content_type, bytes)
    }

    /// An uploaded image by the id part of its `upload://<id>` reference.
    pub fn get_image(&self, id: &str) -> Option<StoredImage> {
        self.images.get_by_id(id)
    }
}

/// Failure of an invoice export request: reading the invoices or rendering them.
#[derive(Debug)]
pub enum ApiExportError {
    Dispatch(DispatchError),
    Export(ExportError),
}

impl From<DispatchError> for ApiExportError {
    fn from(value: DispatchError) -> Self {
        ApiExportError::Dispatch(value)
    }
}

impl From<ExportError> for ApiExportError {
    fn from(value: ExportError) -> Self {
        ApiExportError::Export(value)
    }
}

/// Build services, seeding sample data when configured.
pub fn build_services(seed_sample_data: bool) -> Result<AppServices, DispatchError> {
    let services = AppServices::new();
    if seed_sample_data {
        services.seed_sample_data(UserId::new(1))?;
    }
    Ok(services)
}

#[cfg(test)]
mod tests {
    use laundrydesk_laundry::Priority;

    use super::*;

    fn seeded() -> AppServices {
        build_services(true).unwrap()
    }

    fn input(code: &str, name: &str) -> CategoryInput {
        CategoryInput {
            code: code.to_string(),
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn referenced_category_cannot_be_deleted() {
        let s = seeded();
        let towel = s
            .list_categories(Some("twl"))
            .into_iter()
            .next()
            .unwrap();
        assert!(s.category_item_count(&towel) > 0);

        let err = s.delete_category(towel.id_typed()).unwrap_err();
        assert!(matches!(err, DispatchError::InvariantViolation(_)));
        assert!(s.get_category(towel.id_typed()).is_some());

        let unused = s.create_category(input("MSC", "Misc")).unwrap();
        s.delete_category(unused.id_typed()).unwrap();
        assert!(s.get_category(unused.id_typed()).is_none());
    }

    #[test]
    fn update_keeps_status_unless_given() {
        let s = seeded();
        let c = s.create_category(input("MSC", "Misc")).unwrap();

        let updated = s
            .update_category(c.id_typed(), input("MSC", "Miscellaneous"), None)
            .unwrap();
        assert_eq!(updated.status(), CategoryStatus::Active);
        assert_eq!(updated.created_at(), c.created_at());

        let inactive = s
            .update_category(c.id_typed(), input("MSC", "Miscellaneous"), Some(CategoryStatus::Inactive))
            .unwrap();
        assert_eq!(inactive.status(), CategoryStatus::Inactive);

        let err = s
            .update_category(c.id_typed(), input("TWL", "Clash"), None)
            .unwrap_err();
        assert!(matches!(err, DispatchError::Conflict(_)));
    }

    #[test]
    fn import_creates_rows_in_order_and_reports_failures() {
        let s = AppServices::new();
        let report = s
            .import_categories(b"Code,Name,Description\nA,Alpha,first\nA,Again,dup\n,Blank,\nB,Beta,\n")
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 2);
        let codes: Vec<_> = s.list_categories(None).iter().map(|c| c.code().to_string()).collect();
        assert_eq!(codes, vec!["A", "B"]);
    }

    #[test]
    fn invoice_edit_survives_new_log_entries() {
        let s = seeded();
        let all = InvoiceFilter::default();

        s.edit_invoice(EditInvoice {
            pickup_date: "2024-01-16".to_string(),
            invoice_no: "INV-MANUAL-7".to_string(),
            return_date: Some("2024-01-20".to_string()),
        })
        .unwrap();

        s.add_log_entry("2024-01-16".to_string(), ItemId::new(3), Quantities {
            out_quantity: 4,
            in_quantity: 4,
            pending_quantity: 0,
        })
        .unwrap();

        let invoices = s.list_invoices(&all).unwrap();
        let edited = invoices.iter().find(|i| i.pickup_date == "2024-01-16").unwrap();
        assert_eq!(edited.invoice_no, "INV-MANUAL-7");
        assert_eq!(edited.return_date.as_deref(), Some("2024-01-20"));
        assert_eq!(edited.log_entry_ids.len(), 2);
    }

    #[test]
    fn orders_are_priced_from_the_service_table() {
        let s = seeded();
        let order = s
            .place_order(
                OrderDetails {
                    guest_name: "Ana Lee".to_string(),
                    room_number: "410".to_string(),
                    phone_number: "+62 811-0000-0000".to_string(),
                    priority: Priority::Urgent,
                    pickup_date: "2024-03-01".to_string(),
                    delivery_date: "2024-03-01".to_string(),
                    notes: String::new(),
                },
                vec![OrderLineInput {
                    service_id: ServiceId::new(6),
                    quantity: 2,
                    service_type: None,
                }],
                UserId::new(9),
            )
            .unwrap();

        assert_eq!(order.total_amount(), 32_000);
        assert!(order.order_number().ends_with("-004"));
        assert_eq!(order.items()[0].service, "Wash & Iron");
        assert_eq!(s.order_stats().total_orders, 4);

        let err = s
            .place_order(order_details_without_lines(), vec![OrderLineInput {
                service_id: ServiceId::new(99),
                quantity: 1,
                service_type: None,
            }], UserId::new(9))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
    }

    #[test]
    fn deleted_order_numbers_are_not_reused() {
        let s = seeded();
        let line = || {
            vec![OrderLineInput {
                service_id: ServiceId::new(1),
                quantity: 1,
                service_type: None,
            }]
        };

        let a = s.place_order(order_details_without_lines(), line(), UserId::new(9)).unwrap();
        let b = s.place_order(order_details_without_lines(), line(), UserId::new(9)).unwrap();
        s.delete_order(a.id_typed()).unwrap();
        let c = s.place_order(order_details_without_lines(), line(), UserId::new(9)).unwrap();

        assert_ne!(b.order_number(), c.order_number());
        assert!(b.order_number().ends_with("-005"));
        assert!(c.order_number().ends_with("-006"));
    }

    #[test]
    fn closing_return_needs_an_image_from_the_store() {
        let s = seeded();
        let entry = s
            .add_log_entry("2024-03-04".to_string(), ItemId::new(1), Quantities {
                out_quantity: 5,
                in_quantity: 2,
                pending_quantity: 3,
            })
            .unwrap();

        let err = s
            .record_return(entry.id_typed(), 3, Some("not-an-upload".to_string()))
            .unwrap_err();
        assert!(matches!(err, DispatchError::Validation(_)));
        assert_eq!(s.get_log_entry(entry.id_typed()).unwrap().returned_quantity(), 0);

        let url = s.upload_image("image/png", vec![1, 2, 3]).unwrap();
        let closed = s.record_return(entry.id_typed(), 3, Some(url.clone())).unwrap();
        assert_eq!(closed.returned_image_url(), Some(url.as_str()));
        let id = url.strip_prefix("upload://").unwrap();
        assert_eq!(s.get_image(id).unwrap().content_type, "image/png");
    }

    fn order_details_without_lines() -> OrderDetails {
        OrderDetails {
            guest_name: "X".to_string(),
            room_number: "1".to_string(),
            phone_number: "1".to_string(),
            priority: Priority::Normal,
            pickup_date: "2024-03-01".to_string(),
            delivery_date: "2024-03-02".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn empty_filtered_export_is_refused() {
        let s = seeded();
        let filter = InvoiceFilter::new(
            laundrydesk_invoicing::MonthFilter::Month(12),
            laundrydesk_invoicing::YearFilter::Year(1999),
        );
        let err = s.export_invoices(ExportFormat::Csv, &filter).unwrap_err();
        assert!(matches!(err, ApiExportError::Export(ExportError::Empty)));
    }
}
